//! Upstream client for the Ankr Advanced API.
//!
//! The Advanced API is a JSON-RPC 2.0 endpoint. [`RpcTransport`] is the seam
//! between the typed [`AnkrClient`] and the wire: [`HttpTransport`] speaks
//! HTTP through `reqwest`, tests substitute an in-memory transport.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::error::UpstreamError;

/// A typed upstream request: the params of one Ankr JSON-RPC method.
pub trait AnkrMethod: Serialize {
    /// JSON-RPC method name, e.g. `ankr_getNFTsByOwner`.
    const METHOD: &'static str;
    /// Typed `result` of the method.
    type Reply: DeserializeOwned;
}

/// Sends one JSON-RPC call and returns its `result` member.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(&self, method: &str, params: Value) -> Result<Value, UpstreamError>;
}

/// JSON-RPC over HTTP POST.
pub struct HttpTransport {
    http: Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("ankr-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value, UpstreamError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id
        });

        let transport_err = |message: String, retryable: bool| UpstreamError::Transport {
            method: method.to_string(),
            message,
            retryable,
        };

        let resp = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Request to Ankr failed for {}: {}", method, e);
                transport_err(e.to_string(), e.is_timeout() || e.is_connect() || e.is_request())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(transport_err(
                format!("HTTP {}: {}", status, body.trim()),
                is_transient_status(status),
            ));
        }

        let body: Value = resp.json().await.map_err(|e| UpstreamError::Shape {
            method: method.to_string(),
            message: format!("response is not JSON: {}", e),
        })?;

        if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
            return Err(UpstreamError::Rpc {
                method: method.to_string(),
                code: err.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: err
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }

        body.get("result")
            .cloned()
            .ok_or_else(|| UpstreamError::Shape {
                method: method.to_string(),
                message: "JSON-RPC response missing 'result' field".to_string(),
            })
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Shared handle to the Ankr Advanced API. Immutable once built.
#[derive(Clone)]
pub struct AnkrClient {
    transport: Arc<dyn RpcTransport>,
}

impl AnkrClient {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// Performs exactly one upstream call and decodes the typed reply.
    pub async fn send<M: AnkrMethod>(&self, request: &M) -> Result<M::Reply, UpstreamError> {
        let params = serde_json::to_value(request).map_err(|e| UpstreamError::Shape {
            method: M::METHOD.to_string(),
            message: format!("failed to encode params: {}", e),
        })?;
        debug!("Calling {} with {}", M::METHOD, params);

        let result = self.transport.call(M::METHOD, params).await?;
        serde_json::from_value(result).map_err(|e| UpstreamError::Shape {
            method: M::METHOD.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::models::{GetTokenPriceParams, TokenPriceReply};
    use std::sync::Mutex;

    struct Canned {
        result: Result<Value, ()>,
        seen: Mutex<Vec<(String, Value)>>,
    }

    #[async_trait]
    impl RpcTransport for Canned {
        async fn call(&self, method: &str, params: Value) -> Result<Value, UpstreamError> {
            self.seen.lock().unwrap().push((method.to_string(), params));
            self.result.clone().map_err(|_| UpstreamError::Transport {
                method: method.to_string(),
                message: "down".into(),
                retryable: true,
            })
        }
    }

    #[tokio::test]
    async fn send_uses_method_name_and_decodes_reply() {
        let transport = Arc::new(Canned {
            result: Ok(json!({ "usdPrice": "1.0001", "blockchain": "eth" })),
            seen: Mutex::new(Vec::new()),
        });
        let client = AnkrClient::new(transport.clone());
        let reply: TokenPriceReply = client
            .send(&GetTokenPriceParams {
                blockchain: "eth".into(),
                contract_address: "0xa0b8".into(),
            })
            .await
            .unwrap();

        assert_eq!(reply.usd_price, "1.0001");
        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].0, "ankr_getTokenPrice");
        assert_eq!(seen[0].1["contractAddress"], "0xa0b8");
    }

    #[tokio::test]
    async fn undecodable_reply_is_a_shape_error() {
        let transport = Arc::new(Canned {
            result: Ok(json!({ "usdPrice": 12 })),
            seen: Mutex::new(Vec::new()),
        });
        let client = AnkrClient::new(transport);
        let err = client
            .send(&GetTokenPriceParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Shape { .. }));
    }

    #[test]
    fn rate_limits_and_server_errors_are_transient() {
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient_status(StatusCode::BAD_GATEWAY));
        assert!(!is_transient_status(StatusCode::UNAUTHORIZED));
    }
}
