//! Request body encoding.

use bytes::Bytes;
use serde::Serialize;

use crate::{Result, encode_json};

/// Content type of an encoded request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Binary content type (`application/octet-stream`).
    OctetStream,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request body: raw bytes passed through untouched, or a value to
/// serialize as JSON.
///
/// # Example
///
/// ```
/// use izzi_core::Body;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Upload { name: String }
///
/// let upload = Body::Structured(Upload { name: "report".to_string() });
/// let file: Body<()> = Body::binary(vec![0x89, 0x50, 0x4e, 0x47]);
/// assert!(file.is_binary());
/// assert!(!upload.is_binary());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body<T> {
    /// Opaque bytes, sent verbatim as `application/octet-stream`.
    Binary(Bytes),
    /// A value serialized as `application/json`.
    Structured(T),
}

impl<T> Body<T> {
    /// Create a binary body.
    #[must_use]
    pub fn binary(bytes: impl Into<Bytes>) -> Self {
        Self::Binary(bytes.into())
    }

    /// Returns `true` for a binary body.
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }
}

/// An encoded request body with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    bytes: Bytes,
    content_type: ContentType,
}

impl EncodedBody {
    /// Encoded bytes.
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Content type of the bytes.
    #[must_use]
    pub const fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Consume into (bytes, content type).
    #[must_use]
    pub fn into_parts(self) -> (Bytes, ContentType) {
        (self.bytes, self.content_type)
    }
}

/// Encode an optional request body.
///
/// - no body gives `None`, so no `Content-Type` is sent;
/// - [`Body::Binary`] is passed through unchanged as `application/octet-stream`;
/// - [`Body::Structured`] is serialized as `application/json`, with keys
///   converted to `snake_case` when `convert_naming` is set.
///
/// # Errors
///
/// Returns [`crate::Error::Encode`] if serialization fails.
///
/// # Example
///
/// ```
/// use izzi_core::{Body, ContentType, encode_body};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// #[serde(rename_all = "camelCase")]
/// struct NewUser { user_name: String }
///
/// let body = Body::Structured(NewUser { user_name: "a".to_string() });
/// let encoded = encode_body(Some(body), true).expect("encode").expect("body");
/// assert_eq!(encoded.content_type(), ContentType::Json);
/// assert_eq!(encoded.bytes().as_ref(), br#"{"user_name":"a"}"#);
/// ```
pub fn encode_body<T: Serialize>(
    body: Option<Body<T>>,
    convert_naming: bool,
) -> Result<Option<EncodedBody>> {
    let encoded = match body {
        None => return Ok(None),
        Some(Body::Binary(bytes)) => EncodedBody {
            bytes,
            content_type: ContentType::OctetStream,
        },
        Some(Body::Structured(value)) => EncodedBody {
            bytes: encode_json(&value, convert_naming)?,
            content_type: ContentType::Json,
        },
    };
    Ok(Some(encoded))
}
