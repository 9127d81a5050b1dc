use serde::{Deserialize, Deserializer};
use serde_json::Value;

// the frontend posts category ids straight from a <select>, so they show up
// as strings, while other clients send plain integers
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum StringOrInt {
    Int(i64),
    String(String),
}

impl StringOrInt {
    /// `0` and `""` count as absent, the same as a missing field.
    pub fn is_truthy(&self) -> bool {
        match self {
            StringOrInt::Int(value) => *value != 0,
            StringOrInt::String(value) => !value.is_empty(),
        }
    }

    pub fn into_string(self) -> String {
        match self {
            StringOrInt::Int(value) => value.to_string(),
            StringOrInt::String(value) => value,
        }
    }
}

/// Reads any JSON scalar as text: `null` is empty, numbers and booleans are
/// rendered as written. Arrays and objects are still rejected.
pub fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(value) => Ok(value),
        value @ (Value::Number(_) | Value::Bool(_)) => Ok(value.to_string()),
        _ => Err(serde::de::Error::custom("expected a string")),
    }
}
