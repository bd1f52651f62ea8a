// src/server.rs

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response as HttpResponse},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};

use crate::api::nft::{NftHoldersRequest, NftMetadataRequest, NftTransfersRequest, NftsByOwnerRequest};
use crate::api::query::{
    BlockchainStatsRequest, BlocksRequest, InteractionsRequest, LogsRequest,
    TransactionsByAddressRequest, TransactionsByHashRequest,
};
use crate::api::schema::EmptyRequest;
use crate::api::token::{
    AccountBalanceRequest, CurrenciesRequest, TokenHoldersCountRequest, TokenHoldersRequest,
    TokenPriceRequest, TokenTransfersRequest,
};
use crate::api::{NftApi, QueryApi, TokenApi, Upstream};
use crate::blockchain::{networks, AnkrAuth};
use crate::config::Config;
use crate::error::ToolError;
use crate::mcp::protocol::{error_codes, Request, Response};
use crate::mcp::{handle_mcp_request, Resource, ToolRegistry, ToolRegistryBuilder};
use crate::AppState;

pub const INFO_URI: &str = "ankr://info";
pub const DOCS_URL: &str = "https://www.ankr.com/docs/advanced-api/overview/";
pub const API_CATEGORIES: &[&str] = &["NFT API", "Query API", "Token API"];

/// How the server talks to its MCP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout.
    Stdio,
    /// axum HTTP server on `127.0.0.1:<port>`.
    Http,
}

impl Transport {
    pub fn from_config(config: &Config) -> Self {
        if config.stdio {
            Transport::Stdio
        } else {
            Transport::Http
        }
    }
}

/// Registers one adapter method as a tool named after it.
macro_rules! adapter_tool {
    ($builder:expr, $api:expr, $method:ident, $req:ty, $description:expr) => {{
        let api = $api.clone();
        $builder.tool(stringify!($method), $description, move |req: $req| {
            let api = api.clone();
            async move { api.$method(req).await }
        })
    }};
}

/// Tools of all three families plus the `ankr://info` resource.
pub fn build_registry(upstream: Upstream) -> ToolRegistry {
    let nft = NftApi::new(upstream.clone());
    let query = QueryApi::new(upstream.clone());
    let token = TokenApi::new(upstream);

    let builder = ToolRegistry::builder();
    let builder = register_nft_tools(builder, &nft);
    let builder = register_query_tools(builder, &query);
    let builder = register_token_tools(builder, &token);

    builder
        .tool(
            "get_supported_networks",
            "Get the list of supported blockchain network identifiers",
            move |_: EmptyRequest| {
                let networks = token.get_supported_networks();
                async move { Ok::<_, ToolError>(networks) }
            },
        )
        .resource(info_resource())
        .build()
}

fn register_nft_tools(builder: ToolRegistryBuilder, api: &NftApi) -> ToolRegistryBuilder {
    let b = adapter_tool!(builder, api, get_nfts_by_owner, NftsByOwnerRequest,
        "Get NFTs owned by a wallet address");
    let b = adapter_tool!(b, api, get_nft_metadata, NftMetadataRequest,
        "Get metadata and attributes of a specific NFT");
    let b = adapter_tool!(b, api, get_nft_holders, NftHoldersRequest,
        "Get holders of an NFT collection");
    adapter_tool!(b, api, get_nft_transfers, NftTransfersRequest,
        "Get NFT transfer history by collection, token or wallet")
}

fn register_query_tools(builder: ToolRegistryBuilder, api: &QueryApi) -> ToolRegistryBuilder {
    let b = adapter_tool!(builder, api, get_blockchain_stats, BlockchainStatsRequest,
        "Get statistics of a blockchain network");
    let b = adapter_tool!(b, api, get_blocks, BlocksRequest,
        "Get blocks in a height range");
    let b = adapter_tool!(b, api, get_logs, LogsRequest,
        "Get event logs matching a block range, contract and topics");
    let b = adapter_tool!(b, api, get_transactions_by_hash, TransactionsByHashRequest,
        "Get a transaction by its hash");
    let b = adapter_tool!(b, api, get_transactions_by_address, TransactionsByAddressRequest,
        "Get transactions of a wallet address");
    adapter_tool!(b, api, get_interactions, InteractionsRequest,
        "Get the networks a wallet has interacted with")
}

fn register_token_tools(builder: ToolRegistryBuilder, api: &TokenApi) -> ToolRegistryBuilder {
    let b = adapter_tool!(builder, api, get_account_balance, AccountBalanceRequest,
        "Get token balances of a wallet with USD values");
    let b = adapter_tool!(b, api, get_currencies, CurrenciesRequest,
        "Get currencies available on a network");
    let b = adapter_tool!(b, api, get_token_price, TokenPriceRequest,
        "Get the USD price of a token");
    let b = adapter_tool!(b, api, get_token_holders, TokenHoldersRequest,
        "Get holders of a token with their balances");
    let b = adapter_tool!(b, api, get_token_holders_count, TokenHoldersCountRequest,
        "Get the current and historical holder count of a token");
    adapter_tool!(b, api, get_token_transfers, TokenTransfersRequest,
        "Get token transfer history by contract or wallet")
}

pub fn info_resource() -> Resource {
    Resource {
        uri: INFO_URI,
        name: "Ankr Advanced API",
        description: "Information about the Ankr Advanced API",
        contents: json!({
            "name": "Ankr Advanced API",
            "description": "Multi-chain Web3 data API providing access to NFT, Token and Query data",
            "documentation": DOCS_URL,
            "supported_networks": networks::SUPPORTED_NETWORKS,
            "api_categories": API_CATEGORIES,
        }),
    }
}

/// The server shell: configuration, the shared upstream client and the tool registry.
pub struct Web3McpServer {
    state: AppState,
}

impl Web3McpServer {
    /// Resolves the Ankr endpoint and fails if none is configured.
    pub fn new(config: Config) -> Result<Self, ToolError> {
        let auth = AnkrAuth::new(config.ankr_endpoint.clone(), config.ankr_api_key.clone())?;
        Self::with_auth(config, &auth)
    }

    pub fn with_auth(config: Config, auth: &AnkrAuth) -> Result<Self, ToolError> {
        let upstream = Upstream::new(auth.client()?, config.retry_policy());
        let registry = build_registry(upstream);
        info!(
            "{} ready with {} tools against {}",
            config.server_name,
            registry.names().len(),
            auth.endpoint()
        );
        Ok(Self {
            state: AppState {
                config,
                registry: Arc::new(registry),
            },
        })
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub async fn run(self, transport: Transport) -> Result<()> {
        match transport {
            Transport::Stdio => run_mcp_server(self.state).await,
            Transport::Http => run_http_server(self.state).await,
        }
    }
}

/// HTTP routes, all nested under `/api`.
pub fn router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(health_handler))
        .route("/tools", get(list_tools_handler))
        .route("/tools/:name", post(call_tool_handler))
        // JSON-RPC endpoint for MCP clients
        .route("/rpc", post(rpc_handler));

    Router::new()
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("HTTP server terminated")
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "name": state.config.server_name,
        "version": env!("CARGO_PKG_VERSION"),
        "tools": state.registry.names().len(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn list_tools_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "tools": state.registry.list() }))
}

// Plain REST access to a tool: the body is the tool's arguments object.
async fn call_tool_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> HttpResponse {
    let args = body.map(|Json(v)| v).unwrap_or(Value::Null);
    match state.registry.call(&name, args).await {
        Ok(output) => (StatusCode::OK, Json(output)).into_response(),
        Err(e) => {
            let status = match &e {
                ToolError::Validation { .. } => StatusCode::BAD_REQUEST,
                ToolError::UnknownTool(_) => StatusCode::NOT_FOUND,
                ToolError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ToolError::Upstream(_) => StatusCode::BAD_GATEWAY,
            };
            error!("Tool {} failed: {}", name, e);
            (status, Json(json!({ "kind": e.kind(), "message": e.to_string() }))).into_response()
        }
    }
}

// Forward JSON-RPC requests over HTTP to the MCP handler
async fn rpc_handler(State(state): State<AppState>, Json(req): Json<Request>) -> HttpResponse {
    match handle_mcp_request(req, state).await {
        Some(resp) => Json(resp).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

// --- MCP Server Logic ---
async fn run_mcp_server(state: AppState) -> Result<()> {
    info!("Starting MCP server on stdin/stdout...");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve_lines(state, stdin, stdout).await?;
    info!("MCP server shutting down");
    Ok(())
}

/// Answers newline-delimited JSON-RPC requests until `input` reaches EOF.
pub async fn serve_lines<R, W>(state: AppState, mut input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line).await? == 0 {
            info!("EOF received");
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!("Received: {}", trimmed);

        let response = match serde_json::from_str::<Request>(trimmed) {
            Ok(request) => handle_mcp_request(request, state.clone()).await,
            Err(parse_error) => {
                error!("JSON parse error: {}", parse_error);
                Some(Response::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", parse_error),
                ))
            }
        };

        if let Some(response) = response {
            let mut encoded = serde_json::to_string(&response)?;
            debug!("Sending: {}", encoded);
            encoded.push('\n');
            output.write_all(encoded.as_bytes()).await?;
            output.flush().await?;
        }
    }
}
