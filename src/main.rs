// src/main.rs

use std::env;
use std::process::ExitCode;

use ankr_mcp_server::{config::Config, Transport, Web3McpServer};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the stdio transport
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ankr_mcp_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    if env::args().any(|arg| arg == "--mcp") {
        config.stdio = true;
    }
    let transport = Transport::from_config(&config);

    let server = match Web3McpServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match server.run(transport).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
