//! Core types for the izzi typed HTTP request client.
//!
//! This crate provides the transport-independent building blocks:
//! - [`Error`], [`DecodeCause`] and [`Result`] - The error taxonomy
//! - [`Method`] - HTTP method enum
//! - [`Body`], [`EncodedBody`] and [`encode_body`] - Request body encoding
//! - [`encode_json`] and [`decode_json`] - JSON codec with `snake_case` ⇄ `camelCase` keys
//! - [`CacheStore`], [`CacheEntry`] and [`MemoryCache`] - Response cache
//! - [`Request`], [`RequestBuilder`] and [`Response`] - Transport-level request/response
//! - [`Transport`] - The network exchange capability
//! - [`RequestOptions`] - Per-request options

mod body;
mod cache;
mod codec;
mod error;
mod method;
mod options;
pub mod prelude;
mod rename;
mod request;
mod response;
mod transport;

pub use body::{Body, ContentType, EncodedBody, encode_body};
pub use cache::{CacheEntry, CacheError, CacheStore, MemoryCache};
pub use codec::{decode_json, encode_json, to_camel_case, to_snake_case};
pub use error::{DecodeCause, Error, Result};
pub use method::{Method, UnsupportedMethod};
pub use options::RequestOptions;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use transport::Transport;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
