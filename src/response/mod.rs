//! Response decoding.
//!
//! Context.IO Lite is loose about shapes. The same field can come back as
//! an object, a bare string, or `[]` when empty, and some endpoints answer
//! with raw text instead of JSON. [`decode`] sniffs the body and the helper
//! types below absorb the per-field variation.

use crate::errors::DecodeError;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decode a response body into `T`.
///
/// - `{` or `[` first: strict JSON
/// - empty body: decoded from `null`
/// - anything else: JSON if it parses, otherwise the whole body as a string
pub fn decode<T: DeserializeOwned>(raw: &[u8]) -> Result<T, DecodeError> {
    let first = raw.iter().copied().find(|b| !b.is_ascii_whitespace());
    match first {
        Some(b'{') | Some(b'[') => Ok(serde_json::from_slice(raw)?),
        None => Ok(serde_json::from_value(Value::Null)?),
        Some(_) => match serde_json::from_slice::<Value>(raw) {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(_) => {
                let text = String::from_utf8_lossy(raw).into_owned();
                Ok(serde_json::from_value(Value::String(text))?)
            }
        },
    }
}

/// A field that is either a record, a bare string, or empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Shaped<T> {
    /// Object form
    Structured(T),
    /// Bare string form
    Raw(String),
    /// `[]` or `null`
    Empty,
}

impl<T> Default for Shaped<T> {
    fn default() -> Self {
        Shaped::Empty
    }
}

impl<T> Shaped<T> {
    /// The record, if the object form was received
    pub fn structured(&self) -> Option<&T> {
        match self {
            Shaped::Structured(value) => Some(value),
            _ => None,
        }
    }

    /// The string, if the bare string form was received
    pub fn raw(&self) -> Option<&str> {
        match self {
            Shaped::Raw(value) => Some(value),
            _ => None,
        }
    }

    /// Whether nothing was received
    pub fn is_empty(&self) -> bool {
        matches!(self, Shaped::Empty)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Shaped<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Shaped::Empty),
            Value::Array(items) if items.is_empty() => Ok(Shaped::Empty),
            Value::String(s) => Ok(Shaped::Raw(s)),
            value @ Value::Object(_) => serde_json::from_value(value)
                .map(Shaped::Structured)
                .map_err(D::Error::custom),
            Value::Array(_) => Err(D::Error::custom(
                "expected an object, a string or an empty array, got a non-empty array",
            )),
            other => Err(D::Error::custom(format!(
                "expected an object, a string or an empty array, got {}",
                other
            ))),
        }
    }
}

/// A value sent either alone or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// Single value
    One(T),
    /// List of values
    Many(Vec<T>),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    /// View as a slice
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    /// First value, if any
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Flatten into a vector
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// `deserialize_with` helper: `[]` and `null` decode as `T::default()`.
pub fn empty_array_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(T::default()),
        Value::Array(items) if items.is_empty() => Ok(T::default()),
        value => serde_json::from_value(value).map_err(D::Error::custom),
    }
}

/// Responses that acknowledge a mutation with a `success` flag
pub trait Acknowledgement {
    /// The `success` flag
    fn success(&self) -> bool;

    /// Failure detail sent along with `success: false`, if any
    fn failure_message(&self) -> Option<&str> {
        None
    }
}

/// Turn an HTTP 200 carrying `success: false` into
/// [`LiteError::Application`](crate::errors::LiteError::Application).
pub fn ensure_success<R: Acknowledgement>(
    operation: &'static str,
    response: R,
) -> crate::errors::LiteResult<R> {
    if response.success() {
        Ok(response)
    } else {
        Err(crate::errors::LiteError::Application {
            operation,
            message: response
                .failure_message()
                .unwrap_or("no detail returned")
                .to_string(),
        })
    }
}
