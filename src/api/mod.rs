//! # API Module
//!
//! Request schemas and resource adapters for the Ankr Advanced API.
//! Every adapter method takes one validated request, performs exactly one
//! upstream call and reshapes the reply into a plain JSON mapping.
//!
//! ## Families
//!
//! ### NFT API (`nft`)
//! - `get_nfts_by_owner`, `get_nft_metadata`, `get_nft_holders`, `get_nft_transfers`
//!
//! ### Query API (`query`)
//! - `get_blockchain_stats`, `get_blocks`, `get_logs`, `get_transactions_by_hash`,
//!   `get_transactions_by_address`, `get_interactions`
//!
//! ### Token API (`token`)
//! - `get_account_balance`, `get_currencies`, `get_token_price`, `get_token_holders`,
//!   `get_token_holders_count`, `get_token_transfers`, `get_supported_networks`

pub mod nft;
pub mod normalize;
pub mod query;
pub mod schema;
pub mod token;

use std::sync::Arc;

use crate::blockchain::{AnkrClient, AnkrMethod, RetryPolicy};
use crate::error::ToolError;

pub use nft::NftApi;
pub use normalize::{Reshaped, ToolOutput};
pub use query::QueryApi;
pub use token::TokenApi;

/// Shared upstream handle used by all three adapters.
#[derive(Clone)]
pub struct Upstream {
    client: Arc<AnkrClient>,
    retry: RetryPolicy,
}

impl Upstream {
    pub fn new(client: Arc<AnkrClient>, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// One upstream call, bounded by the retry policy.
    pub async fn call<M>(&self, request: &M) -> Result<M::Reply, ToolError>
    where
        M: AnkrMethod + Sync,
    {
        let client = &self.client;
        let reply = self
            .retry
            .run(M::METHOD, || client.send(request))
            .await?;
        Ok(reply)
    }
}

/// Single wallet filter as the one-element address list the upstream expects.
pub(crate) fn address_list(wallet_address: Option<String>) -> Option<Vec<String>> {
    wallet_address
        .filter(|a| !a.trim().is_empty())
        .map(|a| vec![a])
}
