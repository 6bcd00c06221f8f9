//! Argument validation against a tool's declared input schema
//!
//! Engines occasionally send `30.0` for an integer or omit a required field.
//! Validation happens before a tool runs so the failure can be handed back to
//! the engine as an error payload it can correct.

use super::types::{PropertySchema, ToolDefinition, ToolError};
use serde_json::{Map, Value};

/// Validate `params` against `definition` and return them normalized.
///
/// Unknown extra properties are ignored. Integral floats supplied for
/// `integer` properties are converted to integers.
pub fn validate_arguments(definition: &ToolDefinition, params: Value) -> Result<Value, ToolError> {
    let invalid = |reason: String| ToolError::InvalidArguments {
        tool: definition.name.clone(),
        reason,
    };

    let mut object = match params {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(invalid(format!(
                "arguments must be a JSON object, got {}",
                type_name(&other)
            )))
        }
    };

    for field in &definition.input_schema.required {
        match object.get(field) {
            None | Some(Value::Null) => {
                return Err(invalid(format!("missing required field '{}'", field)))
            }
            Some(_) => {}
        }
    }

    for (name, schema) in &definition.input_schema.properties {
        let Some(value) = object.get_mut(name) else {
            continue;
        };
        if value.is_null() {
            // Optional field explicitly sent as null, treat as absent
            object.remove(name);
            continue;
        }
        check_property(name, schema, value).map_err(&invalid)?;
    }

    Ok(Value::Object(object))
}

fn check_property(name: &str, schema: &PropertySchema, value: &mut Value) -> Result<(), String> {
    match schema.schema_type.as_str() {
        "string" => {
            let Some(text) = value.as_str() else {
                return Err(format!("field '{}' must be a string, got {}", name, type_name(value)));
            };
            if let Some(allowed) = &schema.enum_values {
                if !allowed.iter().any(|v| v == text) {
                    return Err(format!(
                        "field '{}' must be one of [{}], got '{}'",
                        name,
                        allowed.join(", "),
                        text
                    ));
                }
            }
        }
        "number" => {
            let Some(number) = value.as_f64() else {
                return Err(format!("field '{}' must be a number, got {}", name, type_name(value)));
            };
            check_minimum(name, schema, number)?;
        }
        "integer" => {
            let integer = match value.as_i64() {
                Some(i) => i,
                None => match value.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
                    _ => {
                        return Err(format!(
                            "field '{}' must be an integer, got {}",
                            name,
                            value
                        ))
                    }
                },
            };
            check_minimum(name, schema, integer as f64)?;
            *value = Value::from(integer);
        }
        _ => {}
    }
    Ok(())
}

fn check_minimum(name: &str, schema: &PropertySchema, number: f64) -> Result<(), String> {
    if let Some(minimum) = schema.exclusive_minimum {
        if number <= minimum {
            return Err(format!(
                "field '{}' must be greater than {}, got {}",
                name, minimum, number
            ));
        }
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
