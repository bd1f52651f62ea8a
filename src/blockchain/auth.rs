// src/blockchain/auth.rs

use std::env;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};
use url::Url;

use crate::blockchain::client::{AnkrClient, HttpTransport, RpcTransport};
use crate::error::ToolError;

pub const ENDPOINT_ENV: &str = "ANKR_ENDPOINT";
/// Checked in order; the first one set wins.
pub const API_KEY_ENVS: &[&str] = &["ANKR_API_KEY", "ANKR_PRIVATE_KEY"];

/// Resolves the Ankr endpoint and credential and owns the single client handle.
///
/// Construction fails with [`ToolError::Configuration`] when no endpoint can be
/// found, before anything touches the network. The client itself is built on
/// the first call to [`AnkrAuth::client`] and reused afterwards.
pub struct AnkrAuth {
    endpoint: Url,
    api_key: Option<SecretString>,
    client: OnceCell<Arc<AnkrClient>>,
}

impl AnkrAuth {
    /// Explicit arguments take precedence over the process environment.
    pub fn new(endpoint: Option<String>, api_key: Option<SecretString>) -> Result<Self, ToolError> {
        Self::resolve_with(endpoint, api_key, |name| env::var(name).ok())
    }

    /// Same as [`AnkrAuth::new`] with a custom variable lookup.
    pub fn resolve_with<F>(
        endpoint: Option<String>,
        api_key: Option<SecretString>,
        lookup: F,
    ) -> Result<Self, ToolError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = endpoint
            .filter(|e| !e.trim().is_empty())
            .or_else(|| lookup(ENDPOINT_ENV).filter(|e| !e.trim().is_empty()))
            .ok_or_else(|| {
                ToolError::Configuration(format!(
                    "Ankr endpoint not provided. Set the {} environment variable.",
                    ENDPOINT_ENV
                ))
            })?;

        let endpoint = Url::parse(endpoint.trim()).map_err(|e| {
            ToolError::Configuration(format!("invalid Ankr endpoint '{}': {}", endpoint, e))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(ToolError::Configuration(format!(
                "invalid Ankr endpoint '{}': not a base URL",
                endpoint
            )));
        }

        let api_key = api_key
            .filter(|k| !k.expose_secret().trim().is_empty())
            .or_else(|| {
                API_KEY_ENVS
                    .iter()
                    .filter_map(|name| lookup(name))
                    .find(|k| !k.trim().is_empty())
                    .map(SecretString::new)
            });

        if api_key.is_none() {
            warn!("No Ankr API key configured; some API calls may fail without authentication");
        }

        Ok(Self {
            endpoint,
            api_key,
            client: OnceCell::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Endpoint with the API key appended as the last path segment.
    fn rpc_url(&self) -> String {
        let mut url = self.endpoint.clone();
        if let Some(key) = &self.api_key {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(key.expose_secret().trim());
            }
        }
        url.to_string()
    }

    /// The shared client handle, built on first access.
    pub fn client(&self) -> Result<Arc<AnkrClient>, ToolError> {
        self.client
            .get_or_try_init(|| {
                let transport = HttpTransport::new(self.rpc_url()).map_err(|e| {
                    ToolError::Configuration(format!("failed to build HTTP client: {}", e))
                })?;
                info!("Ankr client initialized for {}", self.endpoint);
                Ok(Arc::new(AnkrClient::new(Arc::new(transport))))
            })
            .cloned()
    }

    /// Uses `transport` for the client handle instead of HTTP, replacing any
    /// client already built.
    pub fn with_transport(mut self, transport: Arc<dyn RpcTransport>) -> Self {
        self.client = OnceCell::with_value(Arc::new(AnkrClient::new(transport)));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_endpoint_is_a_configuration_error() {
        let result = AnkrAuth::resolve_with(None, None, lookup_from(&[]));
        assert!(matches!(result, Err(ToolError::Configuration(_))));
    }

    #[test]
    fn blank_endpoint_counts_as_missing() {
        let result = AnkrAuth::resolve_with(Some("  ".into()), None, lookup_from(&[]));
        assert!(matches!(result, Err(ToolError::Configuration(_))));
    }

    #[test]
    fn explicit_arguments_win_over_environment() {
        let auth = AnkrAuth::resolve_with(
            Some("https://explicit.example/multichain".into()),
            Some(SecretString::new("argkey".into())),
            lookup_from(&[
                (ENDPOINT_ENV, "https://env.example/multichain"),
                ("ANKR_API_KEY", "envkey"),
            ]),
        )
        .unwrap();
        assert_eq!(auth.endpoint().host_str(), Some("explicit.example"));
        assert_eq!(auth.rpc_url(), "https://explicit.example/multichain/argkey");
    }

    #[test]
    fn environment_fills_in_missing_arguments() {
        let auth = AnkrAuth::resolve_with(
            None,
            None,
            lookup_from(&[
                (ENDPOINT_ENV, "https://rpc.ankr.com/multichain/"),
                ("ANKR_PRIVATE_KEY", "fallback"),
            ]),
        )
        .unwrap();
        assert!(auth.has_api_key());
        assert_eq!(auth.rpc_url(), "https://rpc.ankr.com/multichain/fallback");
    }

    #[test]
    fn endpoint_is_used_verbatim_without_a_key() {
        let auth = AnkrAuth::resolve_with(
            Some("https://rpc.ankr.com/multichain".into()),
            None,
            lookup_from(&[]),
        )
        .unwrap();
        assert!(!auth.has_api_key());
        assert_eq!(auth.rpc_url(), "https://rpc.ankr.com/multichain");
    }

    #[test]
    fn unparseable_endpoint_is_rejected() {
        let result = AnkrAuth::resolve_with(Some("not a url".into()), None, lookup_from(&[]));
        assert!(matches!(result, Err(ToolError::Configuration(_))));
    }

    #[test]
    fn client_is_built_once() {
        let auth = AnkrAuth::resolve_with(
            Some("https://rpc.ankr.com/multichain".into()),
            None,
            lookup_from(&[]),
        )
        .unwrap();
        let first = auth.client().unwrap();
        let second = auth.client().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn replacing_the_transport_after_first_use_takes_effect() {
        let auth = AnkrAuth::resolve_with(
            Some("https://rpc.ankr.com/multichain".into()),
            None,
            lookup_from(&[]),
        )
        .unwrap();
        let built = auth.client().unwrap();

        let transport = HttpTransport::new("http://127.0.0.1:9/").unwrap();
        let auth = auth.with_transport(Arc::new(transport));
        let replaced = auth.client().unwrap();
        assert!(!Arc::ptr_eq(&built, &replaced));
        assert!(Arc::ptr_eq(&replaced, &auth.client().unwrap()));
    }
}
