//! The JSON-RPC HTTP transport against a local mock server.

use std::sync::Arc;
use std::time::Duration;

use ankr_mcp_server::{
    api::Upstream,
    blockchain::{
        models::GetTokenPriceParams, AnkrAuth, AnkrClient, HttpTransport, RetryPolicy, RpcTransport,
    },
    ToolError, UpstreamError,
};
use mockito::Matcher;
use secrecy::SecretString;
use serde_json::json;

#[tokio::test]
async fn returns_the_result_member() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "jsonrpc": "2.0",
            "method": "ankr_getBlockchainStats",
            "params": { "blockchain": "eth" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":{"stats":[]}}"#)
        .create_async()
        .await;

    let transport = HttpTransport::new(server.url()).unwrap();
    let result = transport
        .call("ankr_getBlockchainStats", json!({ "blockchain": "eth" }))
        .await
        .unwrap();
    assert_eq!(result, json!({ "stats": [] }));
    mock.assert_async().await;
}

#[tokio::test]
async fn json_rpc_errors_are_not_retryable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"invalid blockchain"}}"#)
        .create_async()
        .await;

    let transport = HttpTransport::new(server.url()).unwrap();
    let err = transport.call("ankr_getBlocks", json!({})).await.unwrap_err();
    match &err {
        UpstreamError::Rpc { code, message, .. } => {
            assert_eq!(*code, -32602);
            assert_eq!(message, "invalid blockchain");
        }
        other => panic!("expected rpc error, got {other:?}"),
    }
    assert!(!err.is_transient());
}

#[tokio::test]
async fn http_status_decides_transience() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/busy")
        .with_status(503)
        .with_body("try later")
        .create_async()
        .await;
    server
        .mock("POST", "/denied")
        .with_status(401)
        .with_body("bad key")
        .create_async()
        .await;

    let busy = HttpTransport::new(format!("{}/busy", server.url())).unwrap();
    let err = busy.call("ankr_getLogs", json!({})).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Transport { retryable: true, .. }));

    let denied = HttpTransport::new(format!("{}/denied", server.url())).unwrap();
    let err = denied.call("ankr_getLogs", json!({})).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Transport { retryable: false, .. }));
}

#[tokio::test]
async fn non_json_bodies_are_shape_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let transport = HttpTransport::new(server.url()).unwrap();
    let err = transport.call("ankr_getLogs", json!({})).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Shape { .. }));
}

#[tokio::test]
async fn api_key_is_the_last_path_segment() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/multichain/test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":{"usdPrice":"3120.55"}}"#)
        .create_async()
        .await;

    let auth = AnkrAuth::new(
        Some(format!("{}/multichain", server.url())),
        Some(SecretString::new("test-key".to_string())),
    )
    .unwrap();
    let reply = auth
        .client()
        .unwrap()
        .send(&GetTokenPriceParams {
            blockchain: "eth".into(),
            contract_address: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".into(),
        })
        .await
        .unwrap();
    assert_eq!(reply.usd_price, "3120.55");
    mock.assert_async().await;
}

#[tokio::test]
async fn transient_failures_use_the_retry_budget() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(502)
        .expect(3)
        .create_async()
        .await;

    let transport = HttpTransport::new(server.url()).unwrap();
    let upstream = Upstream::new(
        Arc::new(AnkrClient::new(Arc::new(transport))),
        RetryPolicy::new(Duration::from_secs(5), 2, Duration::from_millis(5)),
    );
    let err = upstream
        .call(&GetTokenPriceParams::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ToolError::Upstream(UpstreamError::Transport { retryable: true, .. })
    ));
    mock.assert_async().await;
}
