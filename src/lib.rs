// src/lib.rs

use std::sync::Arc;

// Re-export modules
pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod mcp;
pub mod server;

pub use error::{ToolError, UpstreamError};
pub use server::{Transport, Web3McpServer};

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Registered tools and resources, immutable after startup
    pub registry: Arc<mcp::ToolRegistry>,
}
