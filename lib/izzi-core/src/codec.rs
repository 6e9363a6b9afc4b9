//! JSON codec with field-name convention translation.
//!
//! The wire format uses `snake_case` keys while target types are expected to
//! name their fields in `camelCase` (typically `#[serde(rename_all = "camelCase")]`).
//! When conversion is enabled, decoding renames keys while streaming the
//! payload, so values reach the target type unaltered. Encoding renames keys
//! in a [`serde_json::Value`] after the structural encode.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::error::Category;

use crate::rename::CamelKeys;
use crate::{DecodeCause, Error, Result};

/// Convert a `snake_case` key to `camelCase`.
///
/// Keys without an interior underscore are returned unchanged, and leading
/// or trailing underscores are kept.
///
/// # Example
///
/// ```
/// use izzi_core::to_camel_case;
///
/// assert_eq!(to_camel_case("user_name"), "userName");
/// assert_eq!(to_camel_case("_private_key_"), "_privateKey_");
/// assert_eq!(to_camel_case("id"), "id");
/// ```
#[must_use]
pub fn to_camel_case(key: &str) -> String {
    let trimmed = key.trim_start_matches('_');
    let (leading, _) = key.split_at(key.len() - trimmed.len());
    let (middle, trailing) = trimmed.split_at(trimmed.trim_end_matches('_').len());

    let mut words = middle.split('_').filter(|word| !word.is_empty());
    let (Some(first), Some(second)) = (words.next(), words.next()) else {
        return key.to_string();
    };

    let mut result = String::with_capacity(key.len());
    result.push_str(leading);
    result.push_str(&first.to_lowercase());
    for word in std::iter::once(second).chain(words) {
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            result.extend(head.to_uppercase());
            result.push_str(&chars.as_str().to_lowercase());
        }
    }
    result.push_str(trailing);
    result
}

/// Convert a `camelCase` key to `snake_case`.
///
/// Words are split on a lowercase-to-uppercase transition and at the end of
/// an uppercase run (acronym); the result is lowercased.
///
/// # Example
///
/// ```
/// use izzi_core::to_snake_case;
///
/// assert_eq!(to_snake_case("userName"), "user_name");
/// assert_eq!(to_snake_case("myURLValue"), "my_url_value");
/// assert_eq!(to_snake_case("id"), "id");
/// ```
#[must_use]
pub fn to_snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut result = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars.get(i - 1).copied().unwrap_or('_');
            let next = chars.get(i + 1).copied();
            let starts_word = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next.is_some_and(char::is_lowercase));
            if starts_word {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }
    result
}

/// Rewrite every object key in `value` with `rename`, recursing into nested
/// objects and arrays.
fn rename_keys(value: Value, rename: fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (rename(&key), rename_keys(value, rename)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|value| rename_keys(value, rename))
                .collect(),
        ),
        other => other,
    }
}

/// Serialize a value to JSON bytes.
///
/// With `convert_naming`, object keys are converted to `snake_case`.
///
/// # Errors
///
/// Returns [`Error::Encode`] if serialization fails; no partial output is
/// produced.
///
/// # Example
///
/// ```
/// use izzi_core::encode_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// #[serde(rename_all = "camelCase")]
/// struct User { user_name: String }
///
/// let user = User { user_name: "a".to_string() };
/// let bytes = encode_json(&user, true).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"user_name":"a"}"#);
/// ```
pub fn encode_json<T: Serialize + ?Sized>(value: &T, convert_naming: bool) -> Result<Bytes> {
    let bytes = if convert_naming {
        let value = serde_json::to_value(value).map_err(Error::Encode)?;
        serde_json::to_vec(&rename_keys(value, to_snake_case))
    } else {
        serde_json::to_vec(value)
    };
    bytes.map(Bytes::from).map_err(Error::Encode)
}

/// Deserialize JSON bytes into `T`, with path-aware, classified errors.
///
/// With `convert_naming`, `snake_case` keys are converted to `camelCase`
/// before decoding; otherwise keys are matched as-is.
///
/// An empty (or whitespace-only) payload decodes from JSON `null`, which
/// succeeds for types such as `()`, `Option<_>` or [`serde_json::Value`]
/// (yielding `Value::Null`). Any other target type fails with
/// [`Error::NoData`].
///
/// Numbers are never routed through an intermediate representation, so
/// `u128`/`i128` fields decode exactly with or without conversion.
///
/// # Errors
///
/// Returns [`Error::NoData`] for an empty payload the type cannot accept, or
/// [`Error::Decode`] with the classified [`DecodeCause`].
///
/// # Example
///
/// ```
/// use izzi_core::decode_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct User { user_name: String }
///
/// let user: User = decode_json(br#"{"user_name":"a"}"#, true).expect("deserialize");
/// assert_eq!(user.user_name, "a");
/// ```
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8], convert_naming: bool) -> Result<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return T::deserialize(Value::Null).map_err(|_| Error::NoData);
    }

    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = if convert_naming {
        serde_path_to_error::deserialize(CamelKeys::new(&mut deserializer))
    } else {
        serde_path_to_error::deserialize(&mut deserializer)
    }
    .map_err(classify)?;
    deserializer.end().map_err(malformed)?;
    Ok(value)
}

fn malformed(err: serde_json::Error) -> Error {
    Error::Decode(DecodeCause::Malformed {
        message: err.to_string(),
    })
}

fn classify(err: serde_path_to_error::Error<serde_json::Error>) -> Error {
    let path = err.path().to_string();
    let inner = err.into_inner();
    if inner.classify() != Category::Data {
        return malformed(inner);
    }

    let message = inner.to_string();
    let cause = if let Some(field) = missing_field(&message) {
        DecodeCause::MissingField { path, field }
    } else if message.starts_with("invalid type: null") {
        DecodeCause::UnexpectedNull { path, message }
    } else {
        DecodeCause::TypeMismatch { path, message }
    };
    Error::Decode(cause)
}

/// Extract `name` from serde's "missing field `name`" message.
fn missing_field(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next().map(str::to_string)
}
