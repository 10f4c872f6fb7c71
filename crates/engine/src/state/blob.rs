//! The `state_<formId>` blob: `base64(json([fieldStatesJson, checksum]))`.

use formbridge_types::FieldStateMap;
use formbridge_util::{EncodingError, KeyedHasher, decode_base64, encode_base64};
use serde_json::Value;
use thiserror::Error;

/// Reasons a state blob cannot be trusted or rebuilt.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state blob encoding: {0}")]
    Encoding(#[from] EncodingError),

    #[error("state blob JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("state blob must be a 2-element array, found {found}")]
    Arity { found: String },

    #[error("state blob element {index} must be a string")]
    ElementType { index: usize },

    #[error("state checksum does not match field states")]
    ChecksumMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBlob {
    /// Serialized field state map, exactly as encoded by the host.
    pub field_states: String,
    pub checksum: String,
}

impl StateBlob {
    pub fn decode(encoded: &str) -> Result<Self, StateError> {
        let json = decode_base64(encoded)?;
        let elements: [Value; 2] = match serde_json::from_str::<Value>(&json)? {
            Value::Array(elements) => elements.try_into().map_err(|elements: Vec<Value>| StateError::Arity {
                found: format!("{} elements", elements.len()),
            })?,
            other => {
                return Err(StateError::Arity {
                    found: json_type_name(&other).to_string(),
                });
            }
        };
        let [field_states, checksum] = elements;
        Ok(Self {
            field_states: element_string(field_states, 0)?,
            checksum: element_string(checksum, 1)?,
        })
    }

    pub fn encode(&self) -> Result<String, StateError> {
        let pair = serde_json::to_string(&[&self.field_states, &self.checksum])?;
        Ok(encode_base64(&pair))
    }

    /// Checks `checksum == hash(crc32(field_states))`.
    pub fn verify(&self, hasher: &KeyedHasher) -> Result<(), StateError> {
        if hasher.verify_checksum(&self.field_states, &self.checksum) {
            Ok(())
        } else {
            Err(StateError::ChecksumMismatch)
        }
    }

    pub fn field_state_map(&self) -> Result<FieldStateMap, StateError> {
        Ok(FieldStateMap::from_json(&self.field_states)?)
    }

    /// Serializes `map` and seals it with a fresh checksum.
    pub fn seal(map: &FieldStateMap, hasher: &KeyedHasher) -> Result<Self, StateError> {
        let field_states = map.to_json()?;
        let checksum = hasher.checksum(&field_states);
        Ok(Self { field_states, checksum })
    }
}

fn element_string(element: Value, index: usize) -> Result<String, StateError> {
    match element {
        Value::String(text) => Ok(text),
        _ => Err(StateError::ElementType { index }),
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
