//! Per-request options.

use std::time::Duration;

/// Options for a single request.
///
/// Unset values fall back to the client configuration: the timeout to the
/// client timeout, the cache expiry to the client cache expiry.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use izzi_core::RequestOptions;
///
/// let options = RequestOptions::new()
///     .with_cache(true)
///     .with_cache_expiry(Duration::from_secs(300))
///     .with_timeout(Duration::from_secs(5));
/// assert!(options.use_cache());
/// assert!(options.convert_naming());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    timeout: Option<Duration>,
    use_cache: bool,
    cache_expiry: Option<Duration>,
    convert_naming: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            use_cache: false,
            cache_expiry: None,
            convert_naming: true,
        }
    }
}

impl RequestOptions {
    /// Default options: no cache, naming conversion on, client timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a cached request with the given expiry.
    #[must_use]
    pub fn cached(expiry: Duration) -> Self {
        Self::default().with_cache(true).with_cache_expiry(expiry)
    }

    /// Set the request timeout.
    ///
    /// A zero timeout is ignored in favor of the client timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enable or disable the response cache (only `GET` is ever cached).
    #[must_use]
    pub const fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Set how long a cached response stays fresh.
    #[must_use]
    pub const fn with_cache_expiry(mut self, expiry: Duration) -> Self {
        self.cache_expiry = Some(expiry);
        self
    }

    /// Enable or disable `snake_case` ⇄ `camelCase` key conversion.
    #[must_use]
    pub const fn with_convert_naming(mut self, convert_naming: bool) -> Self {
        self.convert_naming = convert_naming;
        self
    }

    /// Requested timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.filter(|timeout| !timeout.is_zero())
    }

    /// Whether the response cache is enabled.
    #[must_use]
    pub const fn use_cache(&self) -> bool {
        self.use_cache
    }

    /// Requested cache expiry, if any.
    #[must_use]
    pub const fn cache_expiry(&self) -> Option<Duration> {
        self.cache_expiry
    }

    /// Whether keys are converted between naming conventions.
    #[must_use]
    pub const fn convert_naming(&self) -> bool {
        self.convert_naming
    }
}
