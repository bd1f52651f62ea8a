//! Request-schema machinery shared by every tool.
//!
//! Raw tool arguments go through four checks before a typed request exists:
//! shape and primitive types against the generated JSON schema, supported
//! network names, `serde` decoding, and the `validator` rules declared on the
//! request type. Each failure names the offending field.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use validator::{Validate, ValidationErrors};

use crate::blockchain::networks;
use crate::error::ToolError;

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 10_000;

pub fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Anything that can be decoded from tool arguments.
pub trait ToolRequest: DeserializeOwned + JsonSchema + Validate + Send + 'static {}

impl<T> ToolRequest for T where T: DeserializeOwned + JsonSchema + Validate + Send + 'static {}

/// Arguments of tools that take none.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, Validate)]
pub struct EmptyRequest {}

/// JSON schema advertised in `tools/list` for a request type.
pub fn input_schema<T: JsonSchema>() -> Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(T))
        .unwrap_or_else(|_| json!({ "type": "object" }));
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.entry("properties").or_insert_with(|| json!({}));
    }
    schema
}

/// Decodes and validates `args` against `T`, generating its schema on the fly.
pub fn parse<T: ToolRequest>(args: Value) -> Result<T, ToolError> {
    parse_request(args, &input_schema::<T>())
}

/// Decodes and validates `args` against `T` using a precomputed schema.
pub fn parse_request<T: ToolRequest>(args: Value, schema: &Value) -> Result<T, ToolError> {
    let mut args = match args {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        other => {
            return Err(ToolError::validation(
                "arguments",
                format!("expected an object, got {}", type_name(&other)),
            ))
        }
    };

    // Some clients wrap the arguments in a `request` object.
    if args.len() == 1 && !has_property(schema, "request") {
        if let Some(Value::Object(inner)) = args.get("request") {
            args = inner.clone();
        }
    }

    check_against_schema(&args, schema)?;
    canonicalize_blockchain(&mut args)?;

    let request: T = serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolError::validation(field_from_serde_error(&e.to_string()), e.to_string()))?;

    request.validate().map_err(first_validation_error)?;
    Ok(request)
}

fn has_property(schema: &Value, name: &str) -> bool {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .map_or(false, |props| props.contains_key(name))
}

fn check_against_schema(args: &Map<String, Value>, schema: &Value) -> Result<(), ToolError> {
    let properties = schema.get("properties").and_then(Value::as_object);

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if args.get(field).map_or(true, Value::is_null) {
                return Err(ToolError::validation(field, "missing required field"));
            }
        }
    }

    let Some(properties) = properties else {
        return Ok(());
    };

    for (key, value) in args {
        let Some(property) = properties.get(key) else {
            return Err(ToolError::validation(key.as_str(), "unknown field"));
        };
        let allowed: Vec<&str> = match property.get("type") {
            Some(Value::String(t)) => vec![t.as_str()],
            Some(Value::Array(ts)) => ts.iter().filter_map(Value::as_str).collect(),
            _ => continue,
        };
        if !allowed.iter().any(|t| type_matches(t, value)) {
            return Err(ToolError::validation(
                key.as_str(),
                format!("expected {}, got {}", allowed.join(" or "), type_name(value)),
            ));
        }
        if let (Value::Array(items), Some(Value::String(item_type))) =
            (value, property.pointer("/items/type"))
        {
            if let Some((index, item)) = items
                .iter()
                .enumerate()
                .find(|(_, item)| !type_matches(item_type, item))
            {
                return Err(ToolError::validation(
                    key.as_str(),
                    format!(
                        "element {}: expected {}, got {}",
                        index,
                        item_type,
                        type_name(item)
                    ),
                ));
            }
        }
        if let Some(n) = value.as_f64() {
            if let Some(min) = property.get("minimum").and_then(Value::as_f64) {
                if n < min {
                    return Err(ToolError::validation(
                        key.as_str(),
                        format!("must be at least {}", fmt_bound(min)),
                    ));
                }
            }
            if let Some(max) = property.get("maximum").and_then(Value::as_f64) {
                if n > max {
                    return Err(ToolError::validation(
                        key.as_str(),
                        format!("must be at most {}", fmt_bound(max)),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn canonicalize_blockchain(args: &mut Map<String, Value>) -> Result<(), ToolError> {
    let Some(raw) = args.get("blockchain").and_then(Value::as_str).map(str::to_owned) else {
        return Ok(());
    };
    let canonical = networks::resolve(&raw).ok_or_else(|| {
        ToolError::validation(
            "blockchain",
            format!("unsupported network '{}'; see get_supported_networks", raw),
        )
    })?;
    args.insert("blockchain".to_string(), Value::String(canonical.to_string()));
    Ok(())
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn fmt_bound(bound: f64) -> String {
    if bound.fract() == 0.0 {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}

// serde names the field as "missing field `x`" / "unknown field `x`"
fn field_from_serde_error(message: &str) -> String {
    message
        .split('`')
        .nth(1)
        .filter(|_| message.contains("field `"))
        .unwrap_or("arguments")
        .to_string()
}

fn first_validation_error(errors: ValidationErrors) -> ToolError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<&&str> = field_errors.keys().collect();
    fields.sort();

    let Some(field) = fields.first().map(|f| **f) else {
        return ToolError::validation("arguments", errors.to_string());
    };

    let reason = field_errors
        .get(field)
        .and_then(|errs| errs.first())
        .map(|err| match err.code.as_ref() {
            "length" => "must not be empty".to_string(),
            "range" => format!(
                "must be between {} and {}",
                err.params.get("min").and_then(Value::as_f64).map_or("-".to_string(), fmt_bound),
                err.params.get("max").and_then(Value::as_f64).map_or("-".to_string(), fmt_bound)
            ),
            other => other.to_string(),
        })
        .unwrap_or_else(|| "invalid value".to_string());

    ToolError::validation(field, reason)
}
