//! MCP dispatch, the HTTP router and the stdio loop.

mod common;

use ankr_mcp_server::{
    mcp::{
        handle_mcp_request,
        protocol::{error_codes, Request as RpcRequest, Response as RpcResponse},
    },
    server::{router, serve_lines, INFO_URI},
    AppState,
};
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
};
use common::{server_with, MockTransport};
use serde_json::{json, Value};
use tower::ServiceExt;

fn state() -> (AppState, std::sync::Arc<MockTransport>) {
    let mock = MockTransport::new();
    mock.reply("ankr_getTokenPrice", json!({ "usdPrice": "1.0002" }));
    mock.fail("ankr_getLogs", "upstream unavailable");
    (server_with(&mock).state(), mock)
}

async fn rpc(state: &AppState, method: &str, params: Value) -> RpcResponse {
    handle_mcp_request(RpcRequest::new(json!(1), method, Some(params)), state.clone())
        .await
        .expect("requests with an id get a response")
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn initialize_reports_server_and_capabilities() {
    let (state, _) = state();
    let resp = rpc(&state, "initialize", json!({})).await;
    let result = resp.result.unwrap();
    assert_eq!(result["serverInfo"]["name"], "Ankr Web3 MCP");
    assert!(result["capabilities"]["tools"].is_object());
    assert!(result["capabilities"]["resources"].is_object());
}

#[tokio::test]
async fn tools_list_advertises_every_tool_with_a_schema() {
    let (state, _) = state();
    let resp = rpc(&state, "tools/list", json!({})).await;
    let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), 17);

    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    for expected in [
        "get_nfts_by_owner",
        "get_blockchain_stats",
        "get_account_balance",
        "get_token_price",
        "get_blocks",
        "get_logs",
        "get_nft_metadata",
        "get_nft_holders",
        "get_token_holders_count",
        "get_token_transfers",
        "get_currencies",
        "get_supported_networks",
    ] {
        assert!(names.contains(&expected), "{expected} is not registered");
    }
    for tool in &tools {
        assert_eq!(tool["inputSchema"]["type"], "object", "{}", tool["name"]);
    }
}

#[tokio::test]
async fn tools_call_returns_text_and_structured_content() {
    let (state, _) = state();
    let resp = rpc(
        &state,
        "tools/call",
        json!({ "name": "get_token_price", "arguments": { "blockchain": "eth", "contract_address": "0xc" } }),
    )
    .await;
    let result = resp.result.unwrap();
    assert_eq!(result["isError"], false);
    assert_eq!(result["structuredContent"]["price_usd"], "1.0002");
    assert!(result["content"][0]["text"].as_str().unwrap().contains("1.0002"));
}

#[tokio::test]
async fn upstream_failure_is_an_error_result() {
    let (state, _) = state();
    let resp = rpc(
        &state,
        "tools/call",
        json!({ "name": "get_logs", "arguments": { "blockchain": "eth" } }),
    )
    .await;
    assert!(resp.error.is_none());
    let result = resp.result.unwrap();
    assert_eq!(result["isError"], true);
    assert_eq!(result["structuredContent"]["kind"], "upstream");
    assert!(result["structuredContent"]["message"]
        .as_str()
        .unwrap()
        .contains("upstream unavailable"));
}

#[tokio::test]
async fn bad_arguments_are_invalid_params() {
    let (state, mock) = state();
    let resp = rpc(
        &state,
        "tools/call",
        json!({ "name": "get_token_price", "arguments": { "blockchain": "eth" } }),
    )
    .await;
    let error = resp.error.unwrap();
    assert_eq!(error.code, error_codes::INVALID_PARAMS);
    assert_eq!(error.data.unwrap()["field"], "contract_address");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn unknown_tool_and_method_are_distinguished() {
    let (state, _) = state();
    let resp = rpc(&state, "tools/call", json!({ "name": "get_weather", "arguments": {} })).await;
    assert_eq!(resp.error.unwrap().code, error_codes::INVALID_PARAMS);

    let resp = rpc(&state, "get_weather", json!({})).await;
    assert_eq!(resp.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn tool_names_work_as_methods() {
    let (state, _) = state();
    let resp = rpc(&state, "get_supported_networks", json!({})).await;
    let text = resp.result.unwrap()["content"][0]["text"].as_str().unwrap().to_string();
    let networks: Vec<String> = serde_json::from_str(&text).unwrap();
    assert_eq!(networks[0], "eth");
}

#[tokio::test]
async fn info_resource_is_listed_and_readable() {
    let (state, _) = state();
    let resp = rpc(&state, "resources/list", json!({})).await;
    assert_eq!(resp.result.unwrap()["resources"][0]["uri"], INFO_URI);

    let resp = rpc(&state, "resources/read", json!({ "uri": INFO_URI })).await;
    let text = resp.result.unwrap()["contents"][0]["text"].as_str().unwrap().to_string();
    let info: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(info["name"], "Ankr Advanced API");
    assert_eq!(info["api_categories"], json!(["NFT API", "Query API", "Token API"]));
    assert_eq!(info["supported_networks"][0], "eth");

    let resp = rpc(&state, "resources/read", json!({ "uri": "ankr://missing" })).await;
    assert_eq!(resp.error.unwrap().code, error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn notifications_get_no_response() {
    let (state, _) = state();
    let req = RpcRequest::new(Value::Null, "notifications/initialized", None);
    assert!(handle_mcp_request(req, state).await.is_none());
}

#[tokio::test]
async fn http_health_and_tool_listing() {
    let (state, _) = state();
    let app = router(state);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");

    let response = app
        .oneshot(Request::builder().uri("/api/tools").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(response).await["tools"].as_array().unwrap().len(), 17);
}

#[tokio::test]
async fn http_rpc_endpoint_forwards_to_mcp() {
    let (state, _) = state();
    let response = router(state)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/rpc")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_vec(&json!({
                        "jsonrpc": "2.0",
                        "id": 7,
                        "method": "tools/call",
                        "params": {
                            "name": "get_token_price",
                            "arguments": { "blockchain": "eth", "contract_address": "0xc" }
                        }
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], 7);
    assert_eq!(body["result"]["structuredContent"]["price_usd"], "1.0002");
}

#[tokio::test]
async fn http_tool_route_maps_errors_to_status_codes() {
    let (state, _) = state();
    let app = router(state);

    let post = |uri: &str, body: Value| {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(post("/api/tools/get_token_price", json!({ "blockchain": "eth", "contract_address": "0xc" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["price_usd"], "1.0002");

    let response = app
        .clone()
        .oneshot(post("/api/tools/get_token_price", json!({ "blockchain": "eth" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["kind"], "validation");

    let response = app
        .clone()
        .oneshot(post("/api/tools/get_logs", json!({ "blockchain": "eth" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = app
        .oneshot(post("/api/tools/get_weather", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stdio_loop_answers_each_line() {
    let (state, _) = state();
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
        "\n",
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        "not json\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_supported_networks"}}"#,
        "\n",
    );
    let mut output: Vec<u8> = Vec::new();
    serve_lines(state, input.as_bytes(), &mut output).await.unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[0]["result"], json!({}));
    assert_eq!(lines[1]["error"]["code"], error_codes::PARSE_ERROR);
    assert_eq!(lines[2]["id"], 2);
    assert_eq!(lines[2]["result"]["isError"], false);
}
