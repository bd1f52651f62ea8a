// src/api/token.rs

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use validator::Validate;

use crate::api::normalize::{cursor, page_locally, record, Reshaped, ToolOutput};
use crate::api::schema::default_page_size;
use crate::api::{address_list, Upstream};
use crate::blockchain::models::{
    BalanceAsset, GetAccountBalanceParams, GetCurrenciesParams, GetTokenHoldersCountParams,
    GetTokenHoldersParams, GetTokenPriceParams, GetTokenTransfersParams,
};
use crate::blockchain::{networks, AnkrMethod};
use crate::error::{ToolError, UpstreamError};

const NATIVE: &str = "NATIVE";
const ERC20: &str = "ERC20";

/// Token balances of a wallet, with USD valuations.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct AccountBalanceRequest {
    /// Wallet address (0x...).
    #[validate(length(min = 1))]
    pub wallet_address: String,
    /// Network id; all supported networks when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<String>,
    /// Keep only ERC-20 balances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erc20_only: Option<bool>,
    /// Keep only native coin balances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_only: Option<bool>,
    /// Keep every balance except native coins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 10000))]
    pub page_size: u32,
}

/// Currencies known on a network.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct CurrenciesRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 10000))]
    pub page_size: u32,
}

/// USD price of a token.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct TokenPriceRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
    /// Token contract address.
    #[validate(length(min = 1))]
    pub contract_address: String,
}

/// Holders of an ERC-20 token with their balances.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct TokenHoldersRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
    /// Token contract address.
    #[validate(length(min = 1))]
    pub contract_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 10000))]
    pub page_size: u32,
}

/// Current and historical holder counts of a token.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct TokenHoldersCountRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
    /// Token contract address.
    #[validate(length(min = 1))]
    pub contract_address: String,
}

/// Token transfer history, filtered by token contract or wallet.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
pub struct TokenTransfersRequest {
    /// Network id, e.g. `eth`.
    #[validate(length(min = 1))]
    pub blockchain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    /// Only transfers from or to this wallet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
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

/// Which balances `get_account_balance` keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetFilter {
    All,
    Erc20,
    Native,
    NonNative,
}

impl AssetFilter {
    fn from_request(req: &AccountBalanceRequest) -> Result<Self, ToolError> {
        let flags = [
            ("erc20_only", req.erc20_only, AssetFilter::Erc20),
            ("native_only", req.native_only, AssetFilter::Native),
            ("tokens_only", req.tokens_only, AssetFilter::NonNative),
        ];
        let mut chosen: Option<(&str, AssetFilter)> = None;
        for (field, flag, filter) in flags {
            if flag != Some(true) {
                continue;
            }
            if let Some((previous, _)) = chosen {
                return Err(ToolError::validation(
                    field,
                    format!("cannot be combined with {}", previous),
                ));
            }
            chosen = Some((field, filter));
        }
        Ok(chosen.map_or(AssetFilter::All, |(_, filter)| filter))
    }

    fn keeps(self, asset: &BalanceAsset) -> bool {
        let token_type = asset.token_type.to_ascii_uppercase();
        match self {
            AssetFilter::All => true,
            AssetFilter::Erc20 => token_type == ERC20,
            AssetFilter::Native => token_type == NATIVE,
            AssetFilter::NonNative => token_type != NATIVE,
        }
    }
}

/// Parses an upstream USD price, rejecting anything that is not a positive number.
fn positive_price(method: &str, raw: &str) -> Result<String, UpstreamError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(price) if price.is_finite() && price > 0.0 => Ok(trimmed.to_string()),
        Ok(_) => Err(UpstreamError::rejected(
            method,
            format!("non-positive price '{}'", trimmed),
        )),
        Err(_) => Err(UpstreamError::rejected(
            method,
            format!("unparseable price '{}'", trimmed),
        )),
    }
}

/// Adapter for the Token family of the Advanced API.
#[derive(Clone)]
pub struct TokenApi {
    upstream: Upstream,
}

impl TokenApi {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    /// Balance filters apply to the page the upstream returned, so a filtered
    /// page can hold fewer than `page_size` assets while more pages remain.
    pub async fn get_account_balance(
        &self,
        req: AccountBalanceRequest,
    ) -> Result<ToolOutput, ToolError> {
        let filter = AssetFilter::from_request(&req)?;
        info!("Fetching balances of {}", req.wallet_address);

        let params = GetAccountBalanceParams {
            wallet_address: req.wallet_address,
            blockchain: req.blockchain,
            page_size: Some(req.page_size),
            page_token: cursor(req.page_token),
        };
        let reply = self.upstream.call(&params).await?;

        let assets: Vec<&BalanceAsset> = reply.assets.iter().filter(|a| filter.keeps(a)).collect();
        let listing = Reshaped::listing(
            GetAccountBalanceParams::METHOD,
            "assets",
            &assets,
            req.page_size,
            reply.next_page_token,
        )?
        .with("total_balance_usd", Value::String(reply.total_balance_usd));
        Ok(listing.into_map())
    }

    /// The upstream returns every currency of the network, so they are paged here.
    pub async fn get_currencies(&self, req: CurrenciesRequest) -> Result<ToolOutput, ToolError> {
        let params = GetCurrenciesParams {
            blockchain: req.blockchain,
        };
        let reply = self.upstream.call(&params).await?;

        let (page, next) =
            page_locally(reply.currencies, req.page_size, req.page_token.as_deref())?;
        let listing = Reshaped::listing(
            GetCurrenciesParams::METHOD,
            "currencies",
            &page,
            req.page_size,
            next,
        )?;
        Ok(listing.into_map())
    }

    pub async fn get_token_price(&self, req: TokenPriceRequest) -> Result<ToolOutput, ToolError> {
        let params = GetTokenPriceParams {
            blockchain: req.blockchain,
            contract_address: req.contract_address,
        };
        let reply = self.upstream.call(&params).await?;

        let price = positive_price(GetTokenPriceParams::METHOD, &reply.usd_price).map_err(|e| {
            warn!(
                "Rejecting price for {} on {}: {}",
                params.contract_address, params.blockchain, e
            );
            e
        })?;
        Ok(Reshaped::scalar("price_usd", price).into_map())
    }

    pub async fn get_token_holders(
        &self,
        req: TokenHoldersRequest,
    ) -> Result<ToolOutput, ToolError> {
        let params = GetTokenHoldersParams {
            blockchain: req.blockchain,
            contract_address: req.contract_address,
            page_size: Some(req.page_size),
            page_token: cursor(req.page_token),
        };
        let reply = self.upstream.call(&params).await?;

        let listing = Reshaped::listing(
            GetTokenHoldersParams::METHOD,
            "holders",
            &reply.holders,
            req.page_size,
            reply.next_page_token,
        )?
        .with("holders_count", json!(reply.holders_count))
        .with("token_decimals", json!(reply.token_decimals));
        Ok(listing.into_map())
    }

    pub async fn get_token_holders_count(
        &self,
        req: TokenHoldersCountRequest,
    ) -> Result<ToolOutput, ToolError> {
        const METHOD: &str = GetTokenHoldersCountParams::METHOD;

        let params = GetTokenHoldersCountParams {
            blockchain: req.blockchain,
            contract_address: req.contract_address,
        };
        let reply = self.upstream.call(&params).await?;

        Ok(Reshaped::object(vec![
            ("count", json!(reply.latest_holders_count)),
            ("history", record(METHOD, &reply.holder_count_history)?),
        ])
        .into_map())
    }

    pub async fn get_token_transfers(
        &self,
        req: TokenTransfersRequest,
    ) -> Result<ToolOutput, ToolError> {
        let params = GetTokenTransfersParams {
            blockchain: req.blockchain,
            address: address_list(req.wallet_address),
            contract_address: req.contract_address,
            from_block: req.from_block,
            to_block: req.to_block,
            desc_order: req.descending_order,
            page_size: Some(req.page_size),
            page_token: cursor(req.page_token),
        };
        let reply = self.upstream.call(&params).await?;

        let listing = Reshaped::listing(
            GetTokenTransfersParams::METHOD,
            "transfers",
            &reply.transfers,
            req.page_size,
            reply.next_page_token,
        )?;
        Ok(listing.into_map())
    }

    /// Static: no upstream call.
    pub fn get_supported_networks(&self) -> Vec<String> {
        networks::SUPPORTED_NETWORKS
            .iter()
            .map(|n| n.to_string())
            .collect()
    }
}
