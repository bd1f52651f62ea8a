// src/api/query.rs

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::api::normalize::{cursor, page_locally, record, Reshaped, ToolOutput};
use crate::api::schema::default_page_size;
use crate::api::{address_list, Upstream};
use crate::blockchain::models::{
    GetBlockchainStatsParams, GetBlocksParams, GetInteractionsParams, GetLogsParams,
    GetTransactionsByAddressParams, GetTransactionsByHashParams,
};
use crate::blockchain::AnkrMethod;
use crate::error::{ToolError, UpstreamError};

/// Headline statistics of one network.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct BlockchainStatsRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
}

/// Blocks in a height range.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct BlocksRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_block: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_block: Option<u64>,
    /// Highest block first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descending_order: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 10000))]
    pub page_size: u32,
}

/// Event logs, optionally filtered by emitting contract and topics.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct LogsRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_block: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_block: Option<u64>,
    /// Contract that emitted the logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Topic filters, topic0 first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descending_order: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 10000))]
    pub page_size: u32,
}

/// One transaction by hash.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct TransactionsByHashRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
    /// Transaction hash (0x...).
    #[validate(length(min = 1))]
    pub transaction_hash: String,
}

/// Transactions sent from or to a wallet.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct TransactionsByAddressRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
    #[validate(length(min = 1))]
    pub wallet_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_block: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_block: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descending_order: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 10000))]
    pub page_size: u32,
}

/// Networks on which a wallet has any activity.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct InteractionsRequest {
    #[validate(length(min = 1))]
    pub wallet_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 10000))]
    pub page_size: u32,
}

/// Adapter for the Query family of the Advanced API.
#[derive(Clone)]
pub struct QueryApi {
    upstream: Upstream,
}

impl QueryApi {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    pub async fn get_blockchain_stats(
        &self,
        req: BlockchainStatsRequest,
    ) -> Result<ToolOutput, ToolError> {
        const METHOD: &str = GetBlockchainStatsParams::METHOD;

        let params = GetBlockchainStatsParams {
            blockchain: req.blockchain,
        };
        let reply = self.upstream.call(&params).await?;

        let mut stats = reply.stats;
        let index = stats
            .iter()
            .position(|s| s.blockchain == params.blockchain)
            .unwrap_or(0);
        if stats.is_empty() {
            return Err(UpstreamError::rejected(
                METHOD,
                format!("no statistics returned for {}", params.blockchain),
            )
            .into());
        }
        let entry = stats.swap_remove(index);

        Ok(Reshaped::object(vec![("stats", record(METHOD, &entry)?)]).into_map())
    }

    /// The upstream returns the whole range at once, so blocks are paged here.
    pub async fn get_blocks(&self, req: BlocksRequest) -> Result<ToolOutput, ToolError> {
        let params = GetBlocksParams {
            blockchain: req.blockchain,
            from_block: req.from_block,
            to_block: req.to_block,
            desc_order: req.descending_order,
            include_logs: false,
            include_txs: false,
        };
        let reply = self.upstream.call(&params).await?;

        let (page, next) = page_locally(reply.blocks, req.page_size, req.page_token.as_deref())?;
        let listing = Reshaped::listing(GetBlocksParams::METHOD, "blocks", &page, req.page_size, next)?;
        Ok(listing.into_map())
    }

    pub async fn get_logs(&self, req: LogsRequest) -> Result<ToolOutput, ToolError> {
        let params = GetLogsParams {
            blockchain: req.blockchain,
            from_block: req.from_block,
            to_block: req.to_block,
            address: address_list(req.address),
            topics: req.topics.filter(|t| !t.is_empty()),
            desc_order: req.descending_order,
            page_size: Some(req.page_size),
            page_token: cursor(req.page_token),
        };
        let reply = self.upstream.call(&params).await?;

        let listing = Reshaped::listing(
            GetLogsParams::METHOD,
            "logs",
            &reply.logs,
            req.page_size,
            reply.next_page_token,
        )?;
        Ok(listing.into_map())
    }

    pub async fn get_transactions_by_hash(
        &self,
        req: TransactionsByHashRequest,
    ) -> Result<ToolOutput, ToolError> {
        const METHOD: &str = GetTransactionsByHashParams::METHOD;

        info!("Looking up transaction {}", req.transaction_hash);
        let params = GetTransactionsByHashParams {
            blockchain: req.blockchain,
            transaction_hash: req.transaction_hash,
            include_logs: false,
        };
        let reply = self.upstream.call(&params).await?;

        let transaction = reply.transactions.into_iter().next().ok_or_else(|| {
            UpstreamError::rejected(
                METHOD,
                format!(
                    "transaction {} not found on {}",
                    params.transaction_hash, params.blockchain
                ),
            )
        })?;

        Ok(Reshaped::object(vec![("transaction", record(METHOD, &transaction)?)]).into_map())
    }

    pub async fn get_transactions_by_address(
        &self,
        req: TransactionsByAddressRequest,
    ) -> Result<ToolOutput, ToolError> {
        let params = GetTransactionsByAddressParams {
            blockchain: req.blockchain,
            address: vec![req.wallet_address],
            from_block: req.from_block,
            to_block: req.to_block,
            desc_order: req.descending_order,
            page_size: Some(req.page_size),
            page_token: cursor(req.page_token),
        };
        let reply = self.upstream.call(&params).await?;

        let listing = Reshaped::listing(
            GetTransactionsByAddressParams::METHOD,
            "transactions",
            &reply.transactions,
            req.page_size,
            reply.next_page_token,
        )?;
        Ok(listing.into_map())
    }

    pub async fn get_interactions(&self, req: InteractionsRequest) -> Result<ToolOutput, ToolError> {
        let params = GetInteractionsParams {
            address: req.wallet_address,
        };
        let reply = self.upstream.call(&params).await?;

        let records: Vec<_> = reply
            .blockchains
            .into_iter()
            .map(|blockchain| json!({ "blockchain": blockchain }))
            .collect();
        let (page, next) = page_locally(records, req.page_size, req.page_token.as_deref())?;
        let listing = Reshaped::listing(
            GetInteractionsParams::METHOD,
            "interactions",
            &page,
            req.page_size,
            next,
        )?;
        Ok(listing.into_map())
    }
}
