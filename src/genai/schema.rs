//! Response-schema generation for structured output requests.

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;

/// Derive the JSON schema for `T` and rewrite it into the dialect the
/// generation endpoint accepts: subschemas inlined, draft-07 bookkeeping
/// dropped, type names uppercased (`STRING`, `OBJECT`, ...).
pub(crate) fn response_schema_for<T: JsonSchema>() -> serde_json::Value {
    let mut settings = SchemaSettings::default();
    settings.inline_subschemas = true;
    let root = settings.into_generator().into_root_schema_for::<T>();
    let raw = serde_json::to_value(&root.schema).unwrap_or(serde_json::Value::Null);
    to_service_dialect(&raw)
}

/// The endpoint rejects unknown schema keys, so keep an allowlist and recurse
/// only where nested schemas can appear.
fn to_service_dialect(schema: &serde_json::Value) -> serde_json::Value {
    match schema {
        serde_json::Value::Object(fields) => {
            let allowed_keys = [
                "type",
                "format",
                "description",
                "enum",
                "properties",
                "required",
                "items",
            ];
            let mut filtered = serde_json::Map::new();
            for key in allowed_keys {
                let Some(value) = fields.get(key) else {
                    continue;
                };
                let converted = match key {
                    "type" => uppercase_type(value),
                    "items" => to_service_dialect(value),
                    "properties" => {
                        if let serde_json::Value::Object(properties) = value {
                            let mut converted_properties = serde_json::Map::new();
                            for (name, property) in properties {
                                converted_properties
                                    .insert(name.clone(), to_service_dialect(property));
                            }
                            serde_json::Value::Object(converted_properties)
                        } else {
                            value.clone()
                        }
                    }
                    _ => value.clone(),
                };
                filtered.insert(key.to_string(), converted);
            }
            serde_json::Value::Object(filtered)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(to_service_dialect).collect())
        }
        other => other.clone(),
    }
}

fn uppercase_type(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::String(name) => {
            serde_json::Value::String(name.to_ascii_uppercase())
        }
        serde_json::Value::Array(names) => {
            serde_json::Value::Array(names.iter().map(uppercase_type).collect())
        }
        other => other.clone(),
    }
}
