//! Response cache.
//!
//! Entries are keyed by the canonical request URL and checked for freshness
//! lazily, on read. Nothing is evicted in the background: a stale entry is
//! simply ignored until the next successful fetch overwrites it.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use bytes::Bytes;
use derive_more::{Display, Error};
use tokio::time::Instant;

/// A cached response body with its headers and storage time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    body: Bytes,
    headers: HashMap<String, String>,
    stored_at: Instant,
}

impl CacheEntry {
    /// Creates a new entry stored at `stored_at`.
    #[must_use]
    pub fn new(body: Bytes, headers: HashMap<String, String>, stored_at: Instant) -> Self {
        Self {
            body,
            headers,
            stored_at,
        }
    }

    /// Cached response body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Response headers at the time the entry was stored.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// When the entry was stored.
    #[must_use]
    pub const fn stored_at(&self) -> Instant {
        self.stored_at
    }

    /// Returns `true` while less than `expiry` has elapsed since storage.
    #[must_use]
    pub fn is_fresh(&self, expiry: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < expiry
    }

    /// Consume into the body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }
}

/// Cache storage failure.
///
/// The pipeline never surfaces these to callers: caching is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CacheError {
    /// The store has no room for a new key.
    #[display("cache is full ({capacity} entries)")]
    Full {
        /// Maximum number of entries.
        capacity: usize,
    },

    /// Backend-specific failure.
    #[display("cache backend error: {_0}")]
    Backend(#[error(not(source))] String),
}

/// Storage for cached responses, shared between requests.
///
/// Implementations must be safe for concurrent use; they need not make a
/// lookup-then-store sequence atomic.
pub trait CacheStore: Send + Sync + fmt::Debug {
    /// Get the entry stored under `key`, fresh or not.
    fn lookup(&self, key: &str) -> Option<CacheEntry>;

    /// Store `entry` under `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry could not be stored.
    fn store(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError>;

    /// Remove the entry stored under `key`, returning it.
    fn remove(&self, key: &str) -> Option<CacheEntry>;

    /// Remove every entry.
    fn clear(&self);
}

/// In-memory [`CacheStore`] backed by a `RwLock<HashMap>`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use izzi_core::{CacheStore, MemoryCache};
///
/// // one cache shared by every client that should see the same entries
/// let shared: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
///
/// // bounded cache: new keys are refused once 100 entries are stored
/// let bounded = MemoryCache::with_max_entries(100);
/// assert!(bounded.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    max_entries: Option<usize>,
}

impl MemoryCache {
    /// Create an unbounded cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache holding at most `max_entries` keys.
    #[must_use]
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: RwLock::default(),
            max_entries: Some(max_entries),
        }
    }

    /// Number of stored entries, fresh or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn lookup(&self, key: &str) -> Option<CacheEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn store(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(capacity) = self.max_entries
            && entries.len() >= capacity
            && !entries.contains_key(key)
        {
            return Err(CacheError::Full { capacity });
        }
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> Option<CacheEntry> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
