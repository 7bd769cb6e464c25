//! JSON schemas for flow inputs and generated outputs, and typed decoding of
//! raw JSON into them.
//!
//! Schemas are derived from the types with `schemars` and adjusted for strict
//! structured output. Decoding is serde deserialization followed by the
//! `validator` rules declared on the type, so the schema and the decoder read
//! the same field names and renames.

use schemars::{generate::SchemaSettings, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};
use vynce_llm::JSONSchema;

/// Keywords strict structured output rejects. The bounds they carry are
/// checked by `validator` after decoding instead.
const UNSUPPORTED_KEYWORDS: [&str; 5] = ["$schema", "minLength", "maxLength", "minItems", "maxItems"];

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("{0}")]
    Shape(#[source] serde_json::Error),
    #[error("{0}")]
    Bounds(#[from] ValidationErrors),
}

impl From<serde_json::Error> for DecodeError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_syntax() || error.is_eof() {
            Self::Syntax(error)
        } else {
            Self::Shape(error)
        }
    }
}

/// The schema of `T` with nested types inlined, every property required and
/// no additional properties allowed.
#[must_use]
pub fn schema_for<T: JsonSchema>() -> JSONSchema {
    let mut schema: Value = SchemaSettings::draft2020_12()
        .with(|settings| settings.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<T>()
        .into();
    make_strict(&mut schema);
    schema
}

fn make_strict(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for keyword in UNSUPPORTED_KEYWORDS {
                map.remove(keyword);
            }
            if let Some(Value::Object(properties)) = map.get_mut("properties") {
                let required: Vec<Value> = properties.keys().cloned().map(Value::String).collect();
                properties.values_mut().for_each(make_strict);
                map.insert("required".to_string(), Value::Array(required));
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            map.iter_mut()
                .filter(|(key, _)| key.as_str() != "properties")
                .for_each(|(_, child)| make_strict(child));
        }
        Value::Array(items) => items.iter_mut().for_each(make_strict),
        _ => {}
    }
}

/// Whether the schema can be declared as a strict response schema. Providers
/// only accept an object at the root.
#[must_use]
pub fn is_object(schema: &JSONSchema) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("object")
}

/// Top-level property names of an object schema.
#[must_use]
pub fn property_names(schema: &JSONSchema) -> Vec<&str> {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .map(Map::keys)
        .map(|keys| keys.map(String::as_str).collect())
        .unwrap_or_default()
}

/// Deserialize raw JSON text into `T` and check its declared bounds.
pub fn decode_str<T>(raw: &str) -> Result<T, DecodeError>
where
    T: DeserializeOwned + Validate,
{
    let decoded: T = serde_json::from_str(raw)?;
    decoded.validate()?;
    Ok(decoded)
}

/// Deserialize a JSON value into `T` and check its declared bounds.
pub fn decode_value<T>(value: &Value) -> Result<T, DecodeError>
where
    T: DeserializeOwned + Validate,
{
    let decoded = T::deserialize(value).map_err(DecodeError::Shape)?;
    decoded.validate()?;
    Ok(decoded)
}

/// `validator` rule rejecting text that is empty once trimmed.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}
