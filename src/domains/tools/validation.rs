//! Argument validation against a tool's JSON input schema.
//!
//! Only the subset of JSON Schema that `schemars` emits for flat parameter
//! structs is understood: `type`, `enum`, `const`, `oneOf`/`anyOf`/`allOf`,
//! local `$ref`s and the top-level `required` list. Every offending field is
//! collected so a caller can fix all of them in one round trip.

use std::collections::BTreeMap;

use rmcp::model::JsonObject;
use serde_json::Value;

use super::ToolError;

/// Validate `args` against `schema`.
///
/// Fields not declared in the schema are ignored, mirroring how the
/// arguments are later deserialized.
pub fn validate_arguments(schema: &JsonObject, args: &JsonObject) -> Result<(), ToolError> {
    let mut problems: BTreeMap<&str, String> = BTreeMap::new();

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if args.get(field).is_none_or(Value::is_null) {
                problems.insert(field, "missing required field".to_string());
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (field, value) in args {
            if problems.contains_key(field.as_str()) {
                continue;
            }
            let Some(field_schema) = properties.get(field) else {
                continue;
            };
            if let Some(reason) = check_value(schema, field_schema, value) {
                problems.insert(field.as_str(), reason);
            }
        }
    }

    if problems.is_empty() {
        return Ok(());
    }

    let summary = problems
        .iter()
        .map(|(field, reason)| format!("{field}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ");
    Err(ToolError::invalid_arguments(summary))
}

/// Check one value; returns a reason when it does not conform.
fn check_value(root: &JsonObject, schema: &Value, value: &Value) -> Option<String> {
    let Some(schema) = schema.as_object() else {
        // `true` / `false` boolean schemas.
        return match schema.as_bool() {
            Some(false) => Some("no value is allowed".to_string()),
            _ => None,
        };
    };

    if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
        if let Some(target) = resolve_ref(root, reference) {
            if let Some(reason) = check_value(root, target, value) {
                return Some(reason);
            }
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            return Some(format!("expected one of {}", render_choices(allowed)));
        }
    }

    if let Some(expected) = schema.get("const") {
        if expected != value {
            return Some(format!("expected {}", expected));
        }
    }

    if let Some(types) = schema.get("type") {
        let matches = match types {
            Value::String(t) => type_matches(t, value),
            Value::Array(ts) => ts.iter().filter_map(Value::as_str).any(|t| type_matches(t, value)),
            _ => true,
        };
        if !matches {
            return Some(format!(
                "expected {}, got {}",
                render_types(types),
                json_type_name(value)
            ));
        }
    }

    for key in ["oneOf", "anyOf"] {
        if let Some(variants) = schema.get(key).and_then(Value::as_array) {
            if !variants.iter().any(|v| check_value(root, v, value).is_none()) {
                let consts: Vec<Value> = variants
                    .iter()
                    .filter_map(|v| v.get("const").cloned())
                    .collect();
                return Some(if consts.len() == variants.len() {
                    format!("expected one of {}", render_choices(&consts))
                } else {
                    "does not match any allowed variant".to_string()
                });
            }
        }
    }

    if let Some(parts) = schema.get("allOf").and_then(Value::as_array) {
        if let Some(reason) = parts.iter().find_map(|p| check_value(root, p, value)) {
            return Some(reason);
        }
    }

    None
}

/// Resolve `#/$defs/Name` or `#/definitions/Name` against the root schema.
fn resolve_ref<'a>(root: &'a JsonObject, reference: &str) -> Option<&'a Value> {
    let path = reference.strip_prefix("#/")?;
    let mut segments = path.split('/');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = current.get(segment)?;
    }
    Some(current)
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "number" => value.is_number(),
        "integer" => {
            value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn render_types(types: &Value) -> String {
    match types {
        Value::Array(ts) => ts
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" or "),
        Value::String(t) => t.clone(),
        other => other.to_string(),
    }
}

fn render_choices(choices: &[Value]) -> String {
    let rendered: Vec<String> = choices
        .iter()
        .map(|c| match c {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    format!("[{}]", rendered.join(", "))
}
