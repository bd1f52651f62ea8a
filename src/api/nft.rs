// src/api/nft.rs

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::api::normalize::{cursor, record, Reshaped, ToolOutput};
use crate::api::schema::default_page_size;
use crate::api::{address_list, Upstream};
use crate::blockchain::models::{
    GetNftHoldersParams, GetNftMetadataParams, GetNftTransfersParams, GetNftsByOwnerParams,
};
use crate::blockchain::AnkrMethod;
use crate::error::{ToolError, UpstreamError};

/// NFTs held by one wallet.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct NftsByOwnerRequest {
    /// Owner wallet address (0x...).
    #[validate(length(min = 1))]
    pub wallet_address: String,
    /// Network id such as `eth` or `polygon`; all supported networks when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<String>,
    /// Cursor returned as `next_page_token` by a previous call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    /// Maximum number of assets to return.
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 10000))]
    pub page_size: u32,
}

/// Metadata of a single token.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct NftMetadataRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
    /// NFT collection contract address.
    #[validate(length(min = 1))]
    pub contract_address: String,
    /// Token id within the collection.
    #[validate(length(min = 1))]
    pub token_id: String,
    /// Refetch metadata from the token URI instead of the indexer cache (default true).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_fetch: Option<bool>,
}

/// Holders of an NFT collection.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct NftHoldersRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
    /// NFT collection contract address.
    #[validate(length(min = 1))]
    pub contract_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 10000))]
    pub page_size: u32,
}

/// NFT transfer history, filtered by collection, token or wallet.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct NftTransfersRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    /// Only transfers from or to this wallet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_block: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_block: Option<u64>,
    /// Newest transfers first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descending_order: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 10000))]
    pub page_size: u32,
}

/// Adapter for the NFT family of the Advanced API.
#[derive(Clone)]
pub struct NftApi {
    upstream: Upstream,
}

impl NftApi {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    pub async fn get_nfts_by_owner(&self, req: NftsByOwnerRequest) -> Result<ToolOutput, ToolError> {
        info!("Fetching NFTs owned by {}", req.wallet_address);
        let params = GetNftsByOwnerParams {
            wallet_address: req.wallet_address,
            blockchain: req.blockchain,
            page_size: Some(req.page_size),
            page_token: cursor(req.page_token),
        };
        let reply = self.upstream.call(&params).await?;

        let listing = Reshaped::listing(
            GetNftsByOwnerParams::METHOD,
            "assets",
            &reply.assets,
            req.page_size,
            reply.next_page_token,
        )?;
        Ok(listing.into_map())
    }

    pub async fn get_nft_metadata(&self, req: NftMetadataRequest) -> Result<ToolOutput, ToolError> {
        const METHOD: &str = GetNftMetadataParams::METHOD;

        let params = GetNftMetadataParams {
            blockchain: req.blockchain,
            contract_address: req.contract_address,
            token_id: req.token_id,
            force_fetch: req.force_fetch.unwrap_or(true),
        };
        let reply = self.upstream.call(&params).await?;

        let metadata = reply.metadata.ok_or_else(|| {
            UpstreamError::rejected(
                METHOD,
                format!(
                    "no metadata for token {} of {}",
                    params.token_id, params.contract_address
                ),
            )
        })?;

        Ok(Reshaped::object(vec![
            ("metadata", record(METHOD, &metadata)?),
            ("attributes", record(METHOD, &reply.attributes)?),
            ("sync_status", record(METHOD, &reply.sync_status)?),
        ])
        .into_map())
    }

    pub async fn get_nft_holders(&self, req: NftHoldersRequest) -> Result<ToolOutput, ToolError> {
        let params = GetNftHoldersParams {
            blockchain: req.blockchain,
            contract_address: req.contract_address,
            page_size: Some(req.page_size),
            page_token: cursor(req.page_token),
        };
        let reply = self.upstream.call(&params).await?;

        // Upstream returns bare addresses; give each one a record.
        let holders: Vec<_> = reply
            .holders
            .iter()
            .map(|address| json!({ "holderAddress": address }))
            .collect();
        let listing = Reshaped::listing(
            GetNftHoldersParams::METHOD,
            "holders",
            &holders,
            req.page_size,
            reply.next_page_token,
        )?;
        Ok(listing.into_map())
    }

    pub async fn get_nft_transfers(&self, req: NftTransfersRequest) -> Result<ToolOutput, ToolError> {
        let params = GetNftTransfersParams {
            blockchain: req.blockchain,
            address: address_list(req.wallet_address),
            contract_address: req.contract_address,
            token_id: req.token_id,
            from_block: req.from_block,
            to_block: req.to_block,
            desc_order: req.descending_order,
            page_size: Some(req.page_size),
            page_token: cursor(req.page_token),
        };
        let reply = self.upstream.call(&params).await?;

        let listing = Reshaped::listing(
            GetNftTransfersParams::METHOD,
            "transfers",
            &reply.transfers,
            req.page_size,
            reply.next_page_token,
        )?;
        Ok(listing.into_map())
    }
}
