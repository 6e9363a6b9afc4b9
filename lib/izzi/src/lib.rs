//! Typed HTTP request client for Rust.
//!
//! Send requests with structured or binary bodies and decode JSON responses
//! into your own types. Keys are translated between `snake_case` on the wire
//! and the `camelCase` field names of your types, `GET` responses can be
//! cached for a freshness window, and every failure maps to one [`Error`]
//! variant.
//!
//! # Example
//!
//! ```ignore
//! use izzi::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! pub struct User {
//!     id: u64,
//!     user_name: String,
//! }
//!
//! let client = Client::new();
//! let user: User = client.get("https://api.example.com/users/42").await?;
//!
//! let created: User = client
//!     .post("https://api.example.com/users", Body::Structured(&user))
//!     .await?;
//! ```

mod client;
mod config;
pub mod middleware;
pub mod prelude;
mod transport;

pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use transport::{BoxedService, HyperTransport, HyperTransportBuilder, ServiceFuture};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use izzi_core::{
    Body, CacheEntry, CacheError, CacheStore, ContentType, DecodeCause, EncodedBody, Error,
    MemoryCache, Method, Request, RequestBuilder, RequestOptions, Response, Result, Transport,
    UnsupportedMethod, decode_json, encode_body, encode_json, to_camel_case, to_snake_case,
};

// Re-export http types for status codes and headers
pub use izzi_core::{StatusCode, header};

pub use url;
