//! Tool and resource registry.
//!
//! Every entry pairs a tool name with the JSON schema of its request type and
//! a type-erased handler. Raw arguments are decoded and validated against the
//! request type before the handler runs, so handlers only ever see valid
//! requests. The registry is assembled once through [`ToolRegistryBuilder`]
//! and is read-only afterwards.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::api::schema::{input_schema, parse_request, ToolRequest};
use crate::error::{ToolError, UpstreamError};

pub type ToolFuture = BoxFuture<'static, Result<Value, ToolError>>;
type Handler = Arc<dyn Fn(Value) -> ToolFuture + Send + Sync>;

#[derive(Clone)]
pub struct ToolEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    handler: Handler,
}

impl ToolEntry {
    /// Definition as advertised by `tools/list`.
    pub fn definition(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema,
        })
    }
}

/// A static, read-only JSON resource.
#[derive(Debug, Clone)]
pub struct Resource {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub contents: Value,
}

impl Resource {
    pub fn definition(&self) -> Value {
        json!({
            "uri": self.uri,
            "name": self.name,
            "description": self.description,
            "mimeType": "application/json",
        })
    }
}

#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<ToolEntry>,
    resources: Vec<Resource>,
}

impl ToolRegistryBuilder {
    /// Registers `handler` under `name`. Its request type `R` provides both the
    /// advertised input schema and the argument validation.
    pub fn tool<R, F, Fut, O>(mut self, name: &'static str, description: &'static str, handler: F) -> Self
    where
        R: ToolRequest,
        F: Fn(R) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ToolError>> + Send + 'static,
        O: Serialize + Send + 'static,
    {
        let schema = input_schema::<R>();
        let check = schema.clone();
        let erased: Handler = Arc::new(move |args: Value| -> ToolFuture {
            let call = parse_request::<R>(args, &check).map(&handler);
            Box::pin(async move {
                let output = call?.await?;
                serde_json::to_value(output).map_err(|e| {
                    ToolError::Upstream(UpstreamError::Shape {
                        method: name.to_string(),
                        message: format!("failed to encode result: {}", e),
                    })
                })
            })
        });

        self.tools.push(ToolEntry {
            name,
            description,
            input_schema: schema,
            handler: erased,
        });
        self
    }

    pub fn resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Later registrations under an existing name replace the earlier entry.
    pub fn build(self) -> ToolRegistry {
        let mut tools: Vec<ToolEntry> = Vec::with_capacity(self.tools.len());
        let mut index = HashMap::new();
        for entry in self.tools {
            match index.get(entry.name) {
                Some(&slot) => tools[slot] = entry,
                None => {
                    index.insert(entry.name, tools.len());
                    tools.push(entry);
                }
            }
        }
        ToolRegistry {
            tools,
            index,
            resources: self.resources,
        }
    }
}

pub struct ToolRegistry {
    tools: Vec<ToolEntry>,
    index: HashMap<&'static str, usize>,
    resources: Vec<Resource>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn list(&self) -> Vec<Value> {
        self.tools.iter().map(ToolEntry::definition).collect()
    }

    pub async fn call(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let entry = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        debug!("Dispatching {} with {}", name, args);
        (entry.handler)(args).await
    }

    pub fn resources(&self) -> Vec<Value> {
        self.resources.iter().map(Resource::definition).collect()
    }

    /// Contents of `uri` in `resources/read` form.
    pub fn read_resource(&self, uri: &str) -> Option<Value> {
        let resource = self.resources.iter().find(|r| r.uri == uri)?;
        Some(json!({
            "contents": [{
                "uri": resource.uri,
                "mimeType": "application/json",
                "text": resource.contents.to_string(),
            }]
        }))
    }
}
