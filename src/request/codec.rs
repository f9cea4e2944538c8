//! Parameter struct → wire pairs.
//!
//! Parameter structs are plain `Serialize` types. Whether a field is sent is
//! decided by its serde attributes: optional fields carry
//! `skip_serializing_if` with one of the helpers below, required fields carry
//! nothing and are always sent. The codec then flattens the serialized value:
//!
//! - booleans become `"1"` / `"0"`
//! - numbers are rendered in decimal
//! - nested maps and lists use bracketed keys (`key[sub]`, `key[0]`)
//! - `null` values are dropped

use crate::errors::RequestError;
use serde::Serialize;
use serde_json::Value;

/// Wire encoding of `true`
pub const TRUE_VALUE: &str = "1";

/// Wire encoding of `false`
pub const FALSE_VALUE: &str = "0";

/// `skip_serializing_if` helper for optional boolean flags
pub fn is_false(value: &bool) -> bool {
    !*value
}

/// `skip_serializing_if` helper for optional numbers
pub fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Flatten a parameter struct into ordered `(name, value)` pairs.
pub fn encode_params<P>(params: &P) -> Result<Vec<(String, String)>, RequestError>
where
    P: Serialize + ?Sized,
{
    let value = serde_json::to_value(params).map_err(|e| RequestError::InvalidParameters {
        message: e.to_string(),
    })?;

    let mut pairs = Vec::new();
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, value) in map {
                flatten(key, value, &mut pairs);
            }
        }
        other => {
            return Err(RequestError::InvalidParameters {
                message: format!("parameters must serialize to a map, got {}", kind(&other)),
            })
        }
    }
    Ok(pairs)
}

/// `application/x-www-form-urlencoded` rendering of encoded pairs.
pub fn to_form_urlencoded(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

fn flatten(key: String, value: Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((key, if b { TRUE_VALUE } else { FALSE_VALUE }.to_string())),
        Value::Number(n) => out.push((key, n.to_string())),
        Value::String(s) => out.push((key, s)),
        Value::Array(items) => {
            for (i, item) in items.into_iter().enumerate() {
                flatten(format!("{}[{}]", key, i), item, out);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                flatten(format!("{}[{}]", key, sub), item, out);
            }
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[derive(Serialize, Default)]
    struct Sample {
        #[serde(skip_serializing_if = "String::is_empty")]
        email: String,
        #[serde(skip_serializing_if = "is_zero")]
        limit: u32,
        #[serde(skip_serializing_if = "is_false")]
        include_body: bool,
        use_ssl: bool,
        port: u16,
    }

    fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_defaults_are_omitted_required_are_kept() {
        let pairs = encode_params(&Sample::default()).unwrap();

        assert_eq!(lookup(&pairs, "email"), None);
        assert_eq!(lookup(&pairs, "limit"), None);
        assert_eq!(lookup(&pairs, "include_body"), None);
        assert_eq!(lookup(&pairs, "use_ssl"), Some("0"));
        assert_eq!(lookup(&pairs, "port"), Some("0"));
    }

    #[test]
    fn test_set_values_are_encoded() {
        let params = Sample {
            email: "me@example.com".into(),
            limit: 25,
            include_body: true,
            use_ssl: true,
            port: 993,
        };
        let pairs = encode_params(&params).unwrap();

        assert_eq!(lookup(&pairs, "email"), Some("me@example.com"));
        assert_eq!(lookup(&pairs, "limit"), Some("25"));
        assert_eq!(lookup(&pairs, "include_body"), Some("1"));
        assert_eq!(lookup(&pairs, "use_ssl"), Some("1"));
        assert_eq!(lookup(&pairs, "port"), Some("993"));
    }

    #[test]
    fn test_nested_values_use_brackets() {
        let mut inner = BTreeMap::new();
        inner.insert("name", serde_json::json!("Jo"));
        inner.insert("tags", serde_json::json!(["a", "b"]));
        let mut outer = BTreeMap::new();
        outer.insert("contact", inner);

        let pairs = encode_params(&outer).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("contact[name]".to_string(), "Jo".to_string()),
                ("contact[tags][0]".to_string(), "a".to_string()),
                ("contact[tags][1]".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_unit_encodes_to_nothing() {
        assert!(encode_params(&()).unwrap().is_empty());
    }

    #[test]
    fn test_scalar_is_rejected() {
        let err = encode_params(&"just a string").unwrap_err();
        assert!(matches!(err, RequestError::InvalidParameters { .. }));
    }

    #[test]
    fn test_form_urlencoded() {
        let pairs = vec![
            ("first_name".to_string(), "Jo Ann".to_string()),
            ("callback_url".to_string(), "https://example.com/cb?a=1".to_string()),
        ];
        assert_eq!(
            to_form_urlencoded(&pairs),
            "first_name=Jo+Ann&callback_url=https%3A%2F%2Fexample.com%2Fcb%3Fa%3D1"
        );
    }
}
