// src/blockchain/mod.rs

// Upstream Ankr Advanced API access
pub mod auth;
pub mod client;
pub mod models;
pub mod networks;
pub mod retry;

pub use auth::AnkrAuth;
pub use client::{AnkrClient, AnkrMethod, HttpTransport, RpcTransport};
pub use retry::RetryPolicy;
