//! # MCP Handler Module
//!
//! Implements the Model Context Protocol methods the server answers and
//! dispatches `tools/call` to the tool registry.
//!
//! ## Supported Methods
//! - `initialize`, `ping`
//! - `tools/list`, `tools/call`
//! - `resources/list`, `resources/read`
//!
//! A registered tool name may also be used directly as the JSON-RPC method;
//! such calls are rewritten into `tools/call`.

use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::error::ToolError;
use crate::mcp::protocol::{error_codes, Request, Response, PROTOCOL_VERSION};
use crate::AppState;

const INSTRUCTIONS: &str = "Ankr Advanced API tools: NFT ownership, metadata and transfers; \
blocks, logs and transactions; token balances, prices and holders across supported networks. \
Call get_supported_networks for valid `blockchain` values.";

// Result that always carries a text content item, plus the structured value
// for clients that read JSON.
fn make_texty_result(payload: Value, is_error: bool) -> Value {
    let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    let mut result = json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error,
    });
    if payload.is_object() {
        result["structuredContent"] = payload;
    }
    result
}

/// Maps a failed tool call onto either a JSON-RPC error or an error result.
fn tool_error_response(id: Value, tool: &str, err: ToolError) -> Response {
    match err {
        ToolError::Validation { ref field, ref reason } => {
            warn!("Rejected arguments for {}: {}", tool, err);
            Response::error_with_data(
                id,
                error_codes::INVALID_PARAMS,
                err.to_string(),
                json!({ "kind": err.kind(), "field": field, "reason": reason }),
            )
        }
        ToolError::UnknownTool(ref name) => Response::error_with_data(
            id,
            error_codes::INVALID_PARAMS,
            err.to_string(),
            json!({ "kind": err.kind(), "name": name }),
        ),
        ToolError::Configuration(_) => {
            error!("{} is not usable: {}", tool, err);
            Response::error(id, error_codes::INTERNAL_ERROR, err.to_string())
        }
        ToolError::Upstream(ref upstream) => {
            error!("{} failed upstream: {}", tool, upstream);
            Response::success(
                id,
                make_texty_result(
                    json!({ "kind": err.kind(), "message": upstream.to_string() }),
                    true,
                ),
            )
        }
    }
}

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req, &state),
        "ping" => Response::success(req.id, json!({})),
        "tools/list" => Response::success(req.id, json!({ "tools": state.registry.list() })),
        "tools/call" => handle_tool_call(req, state).await,
        "resources/list" => Response::success(
            req.id,
            json!({ "resources": state.registry.resources() }),
        ),
        "resources/read" => handle_resource_read(req, &state),
        // Direct calls by tool name reuse the tools/call path
        method if state.registry.contains(method) => {
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": method,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

fn handle_initialize(req: &Request, state: &AppState) -> Response {
    let server_info = json!({
        "name": state.config.server_name,
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({
        "tools": { "listChanged": false },
        "resources": { "subscribe": false, "listChanged": false }
    });

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": capabilities,
            "instructions": INSTRUCTIONS
        }),
    )
}

/// Handles a 'tools/call' request by dispatching it to the registered tool.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(Value::as_str) {
        Some(name) => name.to_string(),
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' in tools/call params".into(),
            )
        }
    };
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    info!("Calling tool {}", tool_name);
    match state.registry.call(&tool_name, arguments).await {
        Ok(output) => Response::success(req.id, make_texty_result(output, false)),
        Err(e) => tool_error_response(req.id, &tool_name, e),
    }
}

fn handle_resource_read(req: Request, state: &AppState) -> Response {
    let uri = req
        .params
        .as_ref()
        .and_then(|p| p.get("uri"))
        .and_then(Value::as_str);

    let Some(uri) = uri else {
        return Response::error(
            req.id,
            error_codes::INVALID_PARAMS,
            "Missing 'uri' in resources/read params".into(),
        );
    };

    match state.registry.read_resource(uri) {
        Some(contents) => Response::success(req.id, contents),
        None => Response::error(
            req.id,
            error_codes::INVALID_PARAMS,
            format!("Unknown resource: {}", uri),
        ),
    }
}
