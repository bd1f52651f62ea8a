// src/api/normalize.rs

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ToolError, UpstreamError};

/// Plain mapping returned by every adapter method.
pub type ToolOutput = Map<String, Value>;

/// The three shapes an upstream reply is reshaped into.
#[derive(Debug, Clone, PartialEq)]
pub enum Reshaped {
    /// Named fields of a typed upstream object.
    Object(Map<String, Value>),
    /// Ordered records plus a continuation cursor ("" when exhausted).
    Listing {
        key: &'static str,
        items: Vec<Value>,
        next_page_token: String,
        extra: Map<String, Value>,
    },
    /// A bare value wrapped under its documented key.
    Scalar { key: &'static str, value: Value },
}

impl Reshaped {
    pub fn object(entries: Vec<(&'static str, Value)>) -> Self {
        Reshaped::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// Builds a listing holding at most `page_size` records.
    pub fn listing<T: Serialize>(
        method: &str,
        key: &'static str,
        items: &[T],
        page_size: u32,
        next_page_token: String,
    ) -> Result<Self, UpstreamError> {
        let items = items
            .iter()
            .take(page_size as usize)
            .map(|item| record(method, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Reshaped::Listing {
            key,
            items,
            next_page_token,
            extra: Map::new(),
        })
    }

    /// Adds a top-level field next to a listing's records.
    pub fn with(mut self, field: &'static str, value: Value) -> Self {
        match &mut self {
            Reshaped::Object(map) => {
                map.insert(field.to_string(), value);
            }
            Reshaped::Listing { extra, .. } => {
                extra.insert(field.to_string(), value);
            }
            Reshaped::Scalar { .. } => {}
        }
        self
    }

    pub fn scalar(key: &'static str, value: impl Into<Value>) -> Self {
        Reshaped::Scalar {
            key,
            value: value.into(),
        }
    }

    pub fn into_map(self) -> ToolOutput {
        match self {
            Reshaped::Object(map) => map,
            Reshaped::Listing {
                key,
                items,
                next_page_token,
                extra,
            } => {
                let mut map = Map::new();
                map.insert(key.to_string(), Value::Array(items));
                map.insert("next_page_token".to_string(), Value::String(next_page_token));
                map.extend(extra);
                map
            }
            Reshaped::Scalar { key, value } => {
                let mut map = Map::new();
                map.insert(key.to_string(), value);
                map
            }
        }
    }
}

/// Serializes one typed upstream record into its output mapping.
pub fn record<T: Serialize>(method: &str, item: &T) -> Result<Value, UpstreamError> {
    serde_json::to_value(item).map_err(|e| UpstreamError::Shape {
        method: method.to_string(),
        message: format!("failed to encode record: {}", e),
    })
}

/// Pages a complete upstream result set with an offset cursor.
///
/// The cursor is the decimal offset of the next page; an empty string means
/// the set is exhausted.
pub fn page_locally<T>(
    mut items: Vec<T>,
    page_size: u32,
    page_token: Option<&str>,
) -> Result<(Vec<T>, String), ToolError> {
    let offset = match page_token.map(str::trim).filter(|t| !t.is_empty()) {
        None => 0,
        Some(token) => token
            .parse::<usize>()
            .ok()
            .filter(|offset| *offset <= items.len())
            .ok_or_else(|| ToolError::validation("page_token", format!("invalid page token '{}'", token)))?,
    };

    let end = offset.saturating_add(page_size as usize).min(items.len());
    let next = if end < items.len() {
        end.to_string()
    } else {
        String::new()
    };
    let page: Vec<T> = items.drain(offset..end).collect();
    Ok((page, next))
}

/// Treats empty cursors from clients as "first page".
pub fn cursor(page_token: Option<String>) -> Option<String> {
    page_token.filter(|t| !t.trim().is_empty())
}
