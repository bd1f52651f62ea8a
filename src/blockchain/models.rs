// src/blockchain/models.rs
//
// Request params and typed replies of the Ankr Advanced API JSON-RPC methods.
// Params skip unset optional fields so they never reach the wire as `null`.
// Reply records only carry the fields listed here; anything else the upstream
// sends is dropped during decoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blockchain::client::AnkrMethod;

// --- Shared ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncStatus {
    pub timestamp: Value,
    pub lag: String,
    pub status: String,
}

// --- NFT API ---

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNftsByOwnerParams {
    pub wallet_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NftAsset {
    pub blockchain: String,
    pub name: String,
    pub token_id: String,
    pub token_url: String,
    pub image_url: String,
    pub collection_name: String,
    pub symbol: String,
    pub contract_type: String,
    pub contract_address: String,
    pub quantity: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NftsByOwnerReply {
    pub owner: String,
    pub assets: Vec<NftAsset>,
    pub next_page_token: String,
}

impl AnkrMethod for GetNftsByOwnerParams {
    const METHOD: &'static str = "ankr_getNFTsByOwner";
    type Reply = NftsByOwnerReply;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNftMetadataParams {
    pub blockchain: String,
    pub contract_address: String,
    pub token_id: String,
    pub force_fetch: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NftContractMetadata {
    pub blockchain: String,
    pub contract_address: String,
    pub token_id: String,
    pub contract_type: String,
    pub collection_name: String,
    pub collection_symbol: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NftTrait {
    pub trait_type: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NftAttributes {
    pub token_url: String,
    pub image_url: String,
    pub name: String,
    pub description: String,
    pub contract_type: String,
    pub traits: Vec<NftTrait>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NftMetadataReply {
    pub metadata: Option<NftContractMetadata>,
    pub attributes: Option<NftAttributes>,
    pub sync_status: Option<SyncStatus>,
}

impl AnkrMethod for GetNftMetadataParams {
    const METHOD: &'static str = "ankr_getNFTMetadata";
    type Reply = NftMetadataReply;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNftHoldersParams {
    pub blockchain: String,
    pub contract_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NftHoldersReply {
    pub holders: Vec<String>,
    pub next_page_token: String,
    pub sync_status: Option<SyncStatus>,
}

impl AnkrMethod for GetNftHoldersParams {
    const METHOD: &'static str = "ankr_getNFTHolders";
    type Reply = NftHoldersReply;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNftTransfersParams {
    pub blockchain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc_order: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NftTransfer {
    pub blockchain: String,
    pub from_address: String,
    pub to_address: String,
    pub contract_address: String,
    pub token_id: String,
    pub value: String,
    pub collection_name: String,
    pub collection_symbol: String,
    pub image_url: String,
    pub transaction_hash: String,
    pub block_height: Value,
    pub timestamp: Value,
    #[serde(rename = "type")]
    pub transfer_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NftTransfersReply {
    pub transfers: Vec<NftTransfer>,
    pub next_page_token: String,
}

impl AnkrMethod for GetNftTransfersParams {
    const METHOD: &'static str = "ankr_getNftTransfers";
    type Reply = NftTransfersReply;
}

// --- Query API ---

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBlockchainStatsParams {
    pub blockchain: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockchainStats {
    pub blockchain: String,
    pub total_transactions_count: Value,
    pub total_events_count: Value,
    pub latest_block_number: Value,
    pub block_time_ms: Value,
    pub native_coin_usd_price: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlockchainStatsReply {
    pub stats: Vec<BlockchainStats>,
}

impl AnkrMethod for GetBlockchainStatsParams {
    const METHOD: &'static str = "ankr_getBlockchainStats";
    type Reply = BlockchainStatsReply;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBlocksParams {
    pub blockchain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc_order: Option<bool>,
    pub include_logs: bool,
    pub include_txs: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Block {
    pub blockchain: String,
    pub number: Value,
    pub hash: String,
    pub parent_hash: String,
    pub timestamp: Value,
    pub miner: String,
    pub gas_limit: Value,
    pub gas_used: Value,
    pub size: Value,
    pub difficulty: Value,
    pub nonce: Value,
    pub base_fee_per_gas: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlocksReply {
    pub blocks: Vec<Block>,
}

impl AnkrMethod for GetBlocksParams {
    const METHOD: &'static str = "ankr_getBlocks";
    type Reply = BlocksReply;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLogsParams {
    pub blockchain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc_order: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Log {
    pub blockchain: String,
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    pub block_number: Value,
    pub block_hash: String,
    pub transaction_hash: String,
    pub transaction_index: Value,
    pub log_index: Value,
    pub timestamp: Value,
    pub removed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogsReply {
    pub logs: Vec<Log>,
    pub next_page_token: String,
}

impl AnkrMethod for GetLogsParams {
    const METHOD: &'static str = "ankr_getLogs";
    type Reply = LogsReply;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    pub blockchain: String,
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub contract_address: Option<String>,
    pub value: Value,
    pub gas: Value,
    pub gas_price: Value,
    pub gas_used: Value,
    pub input: String,
    pub nonce: Value,
    pub block_number: Value,
    pub block_hash: String,
    pub transaction_index: Value,
    pub timestamp: Value,
    pub status: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionsReply {
    pub transactions: Vec<Transaction>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionsByHashParams {
    pub blockchain: String,
    pub transaction_hash: String,
    pub include_logs: bool,
}

impl AnkrMethod for GetTransactionsByHashParams {
    const METHOD: &'static str = "ankr_getTransactionsByHash";
    type Reply = TransactionsReply;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionsByAddressParams {
    pub blockchain: String,
    pub address: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc_order: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

impl AnkrMethod for GetTransactionsByAddressParams {
    const METHOD: &'static str = "ankr_getTransactionsByAddress";
    type Reply = TransactionsReply;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetInteractionsParams {
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionsReply {
    pub blockchains: Vec<String>,
    pub sync_status: Option<SyncStatus>,
}

impl AnkrMethod for GetInteractionsParams {
    const METHOD: &'static str = "ankr_getInteractions";
    type Reply = InteractionsReply;
}

// --- Token API ---

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountBalanceParams {
    pub wallet_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceAsset {
    pub blockchain: String,
    pub token_name: String,
    pub token_symbol: String,
    pub token_decimals: u32,
    pub token_type: String,
    pub contract_address: Option<String>,
    pub holder_address: String,
    pub balance: String,
    pub balance_raw_integer: String,
    pub balance_usd: String,
    pub token_price: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountBalanceReply {
    pub total_balance_usd: String,
    pub assets: Vec<BalanceAsset>,
    pub next_page_token: String,
}

impl AnkrMethod for GetAccountBalanceParams {
    const METHOD: &'static str = "ankr_getAccountBalance";
    type Reply = AccountBalanceReply;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCurrenciesParams {
    pub blockchain: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Currency {
    pub blockchain: String,
    pub address: Option<String>,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub thumbnail: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CurrenciesReply {
    pub currencies: Vec<Currency>,
}

impl AnkrMethod for GetCurrenciesParams {
    const METHOD: &'static str = "ankr_getCurrencies";
    type Reply = CurrenciesReply;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTokenPriceParams {
    pub blockchain: String,
    pub contract_address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenPriceReply {
    pub blockchain: String,
    pub contract_address: String,
    pub usd_price: String,
    pub sync_status: Option<SyncStatus>,
}

impl AnkrMethod for GetTokenPriceParams {
    const METHOD: &'static str = "ankr_getTokenPrice";
    type Reply = TokenPriceReply;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTokenHoldersParams {
    pub blockchain: String,
    pub contract_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenHolder {
    pub holder_address: String,
    pub balance: String,
    pub balance_raw_integer: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenHoldersReply {
    pub blockchain: String,
    pub contract_address: String,
    pub token_decimals: u32,
    pub holders: Vec<TokenHolder>,
    pub holders_count: u64,
    pub next_page_token: String,
    pub sync_status: Option<SyncStatus>,
}

impl AnkrMethod for GetTokenHoldersParams {
    const METHOD: &'static str = "ankr_getTokenHolders";
    type Reply = TokenHoldersReply;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTokenHoldersCountParams {
    pub blockchain: String,
    pub contract_address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HolderCount {
    pub holder_count: u64,
    pub total_amount: String,
    pub total_amount_raw_integer: String,
    pub last_updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenHoldersCountReply {
    pub blockchain: String,
    pub contract_address: String,
    pub token_decimals: u32,
    pub holder_count_history: Vec<HolderCount>,
    pub latest_holders_count: u64,
    pub next_page_token: String,
    pub sync_status: Option<SyncStatus>,
}

impl AnkrMethod for GetTokenHoldersCountParams {
    const METHOD: &'static str = "ankr_getTokenHoldersCount";
    type Reply = TokenHoldersCountReply;
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTokenTransfersParams {
    pub blockchain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc_order: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenTransfer {
    pub blockchain: String,
    pub from_address: String,
    pub to_address: String,
    pub contract_address: Option<String>,
    pub value: String,
    pub value_raw_integer: String,
    pub token_name: String,
    pub token_symbol: String,
    pub token_decimals: u32,
    pub thumbnail: String,
    pub transaction_hash: String,
    pub block_height: Value,
    pub timestamp: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenTransfersReply {
    pub transfers: Vec<TokenTransfer>,
    pub next_page_token: String,
}

impl AnkrMethod for GetTokenTransfersParams {
    const METHOD: &'static str = "ankr_getTokenTransfers";
    type Reply = TokenTransfersReply;
}
