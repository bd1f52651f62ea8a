//! Shared fixtures: an in-memory upstream and a server wired to it.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ankr_mcp_server::{
    blockchain::{AnkrAuth, RpcTransport},
    config::Config,
    UpstreamError, Web3McpServer,
};
use async_trait::async_trait;
use serde_json::Value;

/// Records every upstream call and answers from canned replies.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, Result<Value, String>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: &str, result: Value) {
        self.replies
            .lock()
            .unwrap()
            .insert(method.to_string(), Ok(result));
    }

    pub fn fail(&self, method: &str, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(method.to_string(), Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn params_of(&self, method: &str) -> Value {
        self.calls()
            .into_iter()
            .rev()
            .find(|(m, _)| m == method)
            .map(|(_, params)| params)
            .unwrap_or_else(|| panic!("{method} was never called"))
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value, UpstreamError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        match self.replies.lock().unwrap().get(method) {
            Some(Ok(result)) => Ok(result.clone()),
            Some(Err(message)) => Err(UpstreamError::Rpc {
                method: method.to_string(),
                code: -32000,
                message: message.clone(),
            }),
            None => Err(UpstreamError::Rpc {
                method: method.to_string(),
                code: -32601,
                message: "method not mocked".to_string(),
            }),
        }
    }
}

pub fn server_with(mock: &Arc<MockTransport>) -> Web3McpServer {
    let auth = AnkrAuth::new(Some("https://rpc.ankr.com/multichain".into()), None)
        .unwrap()
        .with_transport(mock.clone());
    Web3McpServer::with_auth(Config::default(), &auth).unwrap()
}

/// True when `value` holds an explicit null anywhere.
pub fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(map) => map.values().any(contains_null),
        _ => false,
    }
}
