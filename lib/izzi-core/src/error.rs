//! Error types for izzi.
//!
//! Every failure of the request pipeline is one of the [`Error`] kinds below.
//! None of them is retried automatically.

use std::time::Duration;

use derive_more::{Display, Error, From};

// ============================================================================
// Decode Cause
// ============================================================================

/// Why a payload could not be decoded into the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DecodeCause {
    /// A required field is absent from the payload.
    #[display("missing field `{field}` at '{path}'")]
    MissingField {
        /// JSON path of the object missing the field.
        path: String,
        /// Name of the missing field, as the target type expects it.
        field: String,
    },

    /// A value has the wrong JSON type for the target field.
    #[display("type mismatch at '{path}': {message}")]
    TypeMismatch {
        /// JSON path of the offending value.
        path: String,
        /// Deserializer message.
        message: String,
    },

    /// A `null` was found where a value is required.
    #[display("unexpected null at '{path}': {message}")]
    UnexpectedNull {
        /// JSON path of the `null` value.
        path: String,
        /// Deserializer message.
        message: String,
    },

    /// The payload is not valid JSON.
    #[display("malformed payload: {message}")]
    Malformed {
        /// Parser message, including the position when known.
        message: String,
    },
}

impl DecodeCause {
    /// JSON path of the failure, if it relates to a specific value.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingField { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::UnexpectedNull { path, .. } => Some(path),
            Self::Malformed { .. } => None,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for izzi operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The URL string could not be parsed into an absolute endpoint.
    #[display("invalid URL '{url}': {source}")]
    #[from(skip)]
    InvalidUrl {
        /// The rejected input.
        url: String,
        /// Parser failure.
        source: url::ParseError,
    },

    /// The transport did not yield an interpretable response.
    #[display("failed to receive a valid HTTP response: {_0}")]
    #[from(skip)]
    TransportFailure(#[error(not(source))] String),

    /// The response status is outside `200..=299`.
    #[display("HTTP error {status}: {}", body.as_deref().unwrap_or("no response body"))]
    #[from(skip)]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body as text, when the server sent one.
        body: Option<String>,
    },

    /// The response was successful but carried no payload to decode.
    #[display("no data received from the server")]
    NoData,

    /// The payload could not be decoded into the requested type.
    #[display("decoding error: {_0}")]
    #[from]
    Decode(DecodeCause),

    /// The request body could not be serialized.
    #[display("encoding error: {_0}")]
    #[from(skip)]
    Encode(serde_json::Error),

    /// The call did not complete in time.
    #[display("request timed out after {}ms", after.as_millis())]
    #[from(skip)]
    Timeout {
        /// The timeout that elapsed.
        after: Duration,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    /// Create a transport failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportFailure(message.into())
    }

    /// Create a status error from the raw response body.
    ///
    /// The body is kept as (lossy) UTF-8 text, or dropped when empty.
    #[must_use]
    pub fn status(status: u16, body: &[u8]) -> Self {
        let body = (!body.is_empty()).then(|| String::from_utf8_lossy(body).into_owned());
        Self::Status { status, body }
    }

    /// Create a timeout error.
    #[must_use]
    pub const fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if the transport failed.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::TransportFailure(_))
    }

    /// Returns `true` if the response status was not a success.
    #[must_use]
    pub const fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    /// Returns the HTTP status code if this is a status error.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns the response body text if this is a status error with a body.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Returns the decode cause if this is a decoding error.
    #[must_use]
    pub const fn decode_cause(&self) -> Option<&DecodeCause> {
        match self {
            Self::Decode(cause) => Some(cause),
            _ => None,
        }
    }

    /// Try to decode the body of a status error as a structured error payload.
    ///
    /// Returns `None` if this is not a status error or it has no body.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// #[serde(rename_all = "camelCase")]
    /// struct ApiError {
    ///     error_code: String,
    /// }
    ///
    /// if let Err(err) = client.get::<User>(url).await {
    ///     if let Some(Ok(api_error)) = err.decode_body::<ApiError>(true) {
    ///         eprintln!("API error: {}", api_error.error_code);
    ///     }
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(
        &self,
        convert_naming: bool,
    ) -> Option<Result<T>> {
        self.body_text()
            .map(|body| crate::decode_json(body.as_bytes(), convert_naming))
    }
}
