// src/error.rs

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced to the caller of a tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Malformed or missing request field, raised before any upstream call.
    #[error("invalid argument '{field}': {reason}")]
    Validation { field: String, reason: String },
    /// Missing endpoint/credential when building the upstream client.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ToolError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable tag used in structured error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation { .. } => "validation",
            ToolError::Configuration(_) => "configuration",
            ToolError::Upstream(_) => "upstream",
            ToolError::UnknownTool(_) => "unknown_tool",
        }
    }
}

/// Failures of a single upstream Ankr call.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{method}: transport failure: {message}")]
    Transport {
        method: String,
        message: String,
        retryable: bool,
    },
    #[error("{method}: timed out after {after:?}")]
    Timeout { method: String, after: Duration },
    #[error("{method}: upstream error {code}: {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },
    #[error("{method}: unexpected response shape: {message}")]
    Shape { method: String, message: String },
    #[error("{method}: {message}")]
    Rejected { method: String, message: String },
}

impl UpstreamError {
    pub fn rejected(method: &str, message: impl Into<String>) -> Self {
        UpstreamError::Rejected {
            method: method.to_string(),
            message: message.into(),
        }
    }

    /// Whether another attempt could reasonably succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Transport { retryable, .. } => *retryable,
            UpstreamError::Timeout { .. } => true,
            UpstreamError::Rpc { .. } | UpstreamError::Shape { .. } | UpstreamError::Rejected { .. } => {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_and_timeout_failures_are_transient() {
        let timeout = UpstreamError::Timeout {
            method: "ankr_getBlocks".into(),
            after: Duration::from_secs(1),
        };
        let busy = UpstreamError::Transport {
            method: "ankr_getBlocks".into(),
            message: "HTTP 503".into(),
            retryable: true,
        };
        let rpc = UpstreamError::Rpc {
            method: "ankr_getBlocks".into(),
            code: -32000,
            message: "bad range".into(),
        };
        assert!(timeout.is_transient());
        assert!(busy.is_transient());
        assert!(!rpc.is_transient());
        assert!(!UpstreamError::rejected("ankr_getTokenPrice", "zero price").is_transient());
    }

    #[test]
    fn validation_message_names_the_field() {
        let err = ToolError::validation("wallet_address", "missing field");
        assert_eq!(err.to_string(), "invalid argument 'wallet_address': missing field");
        assert_eq!(err.kind(), "validation");
    }
}
