//! Prelude module for convenient imports.
//!
//! ```ignore
//! use izzi_core::prelude::*;
//! ```

pub use crate::{
    Body, CacheStore, ContentType, DecodeCause, Error, MemoryCache, Method, Request,
    RequestOptions, Response, Result, Transport, decode_json, encode_json,
};
