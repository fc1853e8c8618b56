//! Structured-response schema handed to the model, and validation of what it
//! sends back.
//!
//! The model must answer with `{"reply": "...", "fields": {...}}` where
//! `fields` only uses the document's schema keys and every value is a string
//! or `null`.

use serde_json::{json, Map, Value};

use crate::error::SchemaError;
use crate::types::{ChatResult, DocumentConfig, FieldSet};

/// Name under which the schema is registered with the provider.
pub const RESPONSE_SCHEMA_NAME: &str = "ChatResponse";

/// JSON Schema for a reply plus a partial update of `config`'s fields.
///
/// Strict-mode providers require every property to be listed in `required`,
/// so optional fields are expressed as `["string", "null"]`.
pub fn response_schema(config: &DocumentConfig) -> Value {
    let properties: Map<String, Value> = config
        .fields
        .iter()
        .map(|f| (f.clone(), json!({ "type": ["string", "null"] })))
        .collect();

    json!({
        "type": "object",
        "properties": {
            "reply": { "type": "string" },
            "fields": {
                "type": "object",
                "properties": properties,
                "required": config.fields,
                "additionalProperties": false,
            },
        },
        "required": ["reply", "fields"],
        "additionalProperties": false,
    })
}

/// Validate raw model output against `config`'s response schema.
///
/// Keys outside the schema are ignored; `null` and empty values are dropped,
/// so the returned [`ChatResult::fields`] only holds asserted values.
pub fn parse_model_reply(config: &DocumentConfig, raw: &str) -> Result<ChatResult, SchemaError> {
    let value: Value = serde_json::from_str(raw.trim())?;
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            let found = kind(&other);
            return Err(SchemaError::Shape(format!("expected an object, got {found}")));
        }
    };

    let reply = match object.remove("reply") {
        Some(Value::String(reply)) => reply,
        Some(other) => {
            let found = kind(&other);
            return Err(SchemaError::Shape(format!("`reply` must be a string, got {found}")));
        }
        None => return Err(SchemaError::Shape("missing `reply`".to_string())),
    };

    let mut fields = FieldSet::new();
    match object.remove("fields") {
        None | Some(Value::Null) => {}
        Some(Value::Object(entries)) => {
            for (name, value) in entries {
                if !config.has_field(&name) {
                    continue;
                }
                match value {
                    Value::String(s) if !s.is_empty() => fields.insert(name, s),
                    Value::String(_) | Value::Null => {}
                    other => {
                        return Err(SchemaError::FieldType {
                            field: name,
                            found: kind(&other),
                        })
                    }
                }
            }
        }
        Some(other) => {
            let found = kind(&other);
            return Err(SchemaError::Shape(format!("`fields` must be an object, got {found}")));
        }
    }

    Ok(ChatResult {
        reply,
        fields,
        detected_doc_type: None,
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
