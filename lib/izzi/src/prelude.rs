//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for easy glob
//! importing:
//!
//! ```ignore
//! use izzi::prelude::*;
//! ```

pub use crate::{
    Body, CacheStore, Client, ClientConfig, DecodeCause, Error, MemoryCache, Method,
    RequestOptions, Result, StatusCode,
};
pub use serde::{Deserialize, Serialize};
pub use std::time::Duration;
