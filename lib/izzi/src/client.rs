//! The typed request client.
//!
//! [`Client::request`] runs the whole pipeline for one call: URL validation,
//! body encoding, cache lookup, the network exchange under a timeout, status
//! validation, cache storage and response decoding.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use izzi_core::{
    Body, CacheEntry, CacheStore, MemoryCache, Method, Request, RequestOptions, Transport,
    decode_json, encode_body,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{Instrument, debug, info_span, warn};
use url::Url;

use crate::{
    Error, HyperTransport, Result,
    config::{ClientConfig, ClientConfigBuilder},
};

/// Typed HTTP request client.
///
/// A client owns a transport and a shared response cache. Cloning a client is
/// cheap and the clones share the cache.
///
/// # Example
///
/// ```ignore
/// use izzi::prelude::*;
///
/// #[derive(Debug, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct Post {
///     user_id: u64,
///     title: String,
/// }
///
/// let client = Client::new();
/// let post: Post = client
///     .get_cached("https://jsonplaceholder.typicode.com/posts/1", Duration::from_secs(60))
///     .await?;
/// ```
#[derive(Clone)]
pub struct Client<T = HyperTransport> {
    transport: T,
    cache: Arc<dyn CacheStore>,
    config: ClientConfig,
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with the default configuration, a hyper transport and
    /// an in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a client builder.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Client<T> {
    /// Create a client over a custom transport, with the default
    /// configuration and a fresh in-memory cache.
    #[must_use]
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            cache: Arc::new(MemoryCache::new()),
            config: ClientConfig::default(),
        }
    }

    /// Use the given cache store, possibly shared with other clients.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = cache;
        self
    }

    /// Use the given configuration for the pipeline settings only: the
    /// default timeout and cache expiry.
    ///
    /// The transport keeps the connection settings it was built with. For a
    /// [`HyperTransport`] those are the connect timeout and pool settings,
    /// fixed when its connector was created. Use [`Client::builder`] to
    /// configure both the pipeline and the transport.
    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the cache store.
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Get the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform a request and decode the response body into `R`.
    ///
    /// Only `GET` requests with [`RequestOptions::use_cache`] set read and
    /// write the cache; the cache key is the normalized URL.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if `url` cannot be parsed, before any I/O;
    /// - [`Error::Encode`] if the body cannot be serialized;
    /// - [`Error::TransportFailure`] if no HTTP response was received;
    /// - [`Error::Timeout`] if the exchange took longer than the timeout;
    /// - [`Error::Status`] if the status is outside `200..=299`;
    /// - [`Error::NoData`] if the body is empty and `R` needs a value;
    /// - [`Error::Decode`] if the body does not match `R`.
    pub async fn request<R, B>(
        &self,
        url: &str,
        method: Method,
        headers: Option<HashMap<String, String>>,
        body: Option<Body<B>>,
        options: RequestOptions,
    ) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize,
    {
        let span = info_span!("izzi_request", %method, url);
        self.execute(url, method, headers, body, options)
            .instrument(span)
            .await
    }

    async fn execute<R, B>(
        &self,
        url: &str,
        method: Method,
        headers: Option<HashMap<String, String>>,
        body: Option<Body<B>>,
        options: RequestOptions,
    ) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize,
    {
        let url = Url::parse(url).map_err(|source| Error::invalid_url(url, source))?;
        let convert_naming = options.convert_naming();
        let encoded = encode_body(body, convert_naming)?;

        let cacheable = method.is_cacheable() && options.use_cache();
        let expiry = options.cache_expiry().unwrap_or(self.config.cache_expiry);

        if cacheable {
            match self.cache.lookup(url.as_str()) {
                Some(entry) if entry.is_fresh(expiry, Instant::now()) => {
                    debug!(age_ms = age_ms(&entry), "serving response from cache");
                    return decode_json(entry.body(), convert_naming);
                }
                Some(entry) => debug!(age_ms = age_ms(&entry), "cached response expired"),
                None => debug!("cache miss"),
            }
        }

        let timeout = options.timeout().unwrap_or(self.config.timeout);
        let mut builder = Request::builder(method, url).timeout(timeout);
        if let Some(headers) = headers {
            builder = builder.headers(headers);
        }
        if let Some(encoded) = encoded {
            builder = builder.encoded_body(encoded);
        }
        let request = builder.build();
        let key = request.cache_key().to_string();

        debug!(?timeout, "sending request");
        let response = tokio::time::timeout(timeout, self.transport.execute(request))
            .await
            .map_err(|_| Error::timeout(timeout))??;

        let (status, headers, bytes) = response.into_parts();
        if !(200..=299).contains(&status) {
            warn!(status, "unexpected HTTP status");
            return Err(Error::status(status, &bytes));
        }

        if cacheable {
            let entry = CacheEntry::new(bytes.clone(), headers, Instant::now());
            if let Err(err) = self.cache.store(&key, entry) {
                warn!(error = %err, "cannot cache response");
            }
        }

        debug!(status, len = bytes.len(), "decoding response");
        decode_json(&bytes, convert_naming)
    }

    /// Perform a request without a body.
    ///
    /// # Errors
    ///
    /// Same as [`Client::request`].
    pub async fn request_without_body<R: DeserializeOwned>(
        &self,
        url: &str,
        method: Method,
        headers: Option<HashMap<String, String>>,
        options: RequestOptions,
    ) -> Result<R> {
        self.request(url, method, headers, None::<Body<()>>, options)
            .await
    }

    /// `GET` a resource, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Same as [`Client::request`].
    pub async fn get<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        self.request_without_body(url, Method::Get, None, RequestOptions::new())
            .await
    }

    /// `GET` a resource through the cache, with the given freshness window.
    ///
    /// # Errors
    ///
    /// Same as [`Client::request`].
    pub async fn get_cached<R: DeserializeOwned>(&self, url: &str, expiry: Duration) -> Result<R> {
        self.request_without_body(url, Method::Get, None, RequestOptions::cached(expiry))
            .await
    }

    /// `POST` a body.
    ///
    /// # Errors
    ///
    /// Same as [`Client::request`].
    pub async fn post<R: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: Body<B>,
    ) -> Result<R> {
        self.request(url, Method::Post, None, Some(body), RequestOptions::new())
            .await
    }

    /// `PUT` a body.
    ///
    /// # Errors
    ///
    /// Same as [`Client::request`].
    pub async fn put<R: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: Body<B>,
    ) -> Result<R> {
        self.request(url, Method::Put, None, Some(body), RequestOptions::new())
            .await
    }

    /// `PATCH` a body.
    ///
    /// # Errors
    ///
    /// Same as [`Client::request`].
    pub async fn patch<R: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: Body<B>,
    ) -> Result<R> {
        self.request(url, Method::Patch, None, Some(body), RequestOptions::new())
            .await
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// Same as [`Client::request`].
    pub async fn delete<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        self.request_without_body(url, Method::Delete, None, RequestOptions::new())
            .await
    }
}

fn age_ms(entry: &CacheEntry) -> u64 {
    let age = Instant::now().saturating_duration_since(entry.stored_at());
    u64::try_from(age.as_millis()).unwrap_or(u64::MAX)
}

/// Builder for a [`Client`] over the hyper transport.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfigBuilder,
    cache: Option<Arc<dyn CacheStore>>,
    logging: bool,
}

impl ClientBuilder {
    /// Set the default request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Set the default cache expiry.
    #[must_use]
    pub fn cache_expiry(mut self, expiry: Duration) -> Self {
        self.config = self.config.cache_expiry(expiry);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    /// Use the given cache store instead of a fresh in-memory one.
    #[must_use]
    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Log every exchange with the [`LoggingLayer`](crate::middleware::LoggingLayer).
    #[must_use]
    pub const fn with_logging(mut self) -> Self {
        self.logging = true;
        self
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> Client {
        let mut transport = HyperTransport::builder().config(self.config.clone());
        if self.logging {
            transport = transport.with_logging();
        }

        Client {
            transport: transport.build(),
            config: self.config.build(),
            cache: self
                .cache
                .unwrap_or_else(|| Arc::new(MemoryCache::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_applies_config() {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .cache_expiry(Duration::from_secs(120))
            .with_logging()
            .build();

        assert_eq!(client.config().timeout, Duration::from_secs(5));
        assert_eq!(client.config().cache_expiry, Duration::from_secs(120));
        assert_eq!(client.transport().config().timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn with_config_leaves_transport_settings_alone() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(7))
            .connect_timeout(Duration::from_secs(1))
            .cache_expiry(Duration::from_secs(5))
            .build();
        let client = Client::new().with_config(config);

        assert_eq!(client.config().timeout, Duration::from_secs(7));
        assert_eq!(client.config().cache_expiry, Duration::from_secs(5));

        let defaults = ClientConfig::default();
        assert_eq!(client.transport().config().timeout, defaults.timeout);
        assert_eq!(
            client.transport().config().connect_timeout,
            defaults.connect_timeout
        );
    }

    #[tokio::test]
    async fn builder_uses_given_cache() {
        let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::with_max_entries(3));
        let client = Client::builder().cache(Arc::clone(&cache)).build();

        assert!(Arc::ptr_eq(client.cache(), &cache));
    }

    #[tokio::test]
    async fn invalid_url_is_reported_before_any_io() {
        let client = Client::new();
        let err = client
            .get::<serde_json::Value>("not a url")
            .await
            .expect_err("invalid url");

        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn debug_hides_transport() {
        let debug = format!("{:?}", Client::new());
        assert!(debug.starts_with("Client"));
        assert!(debug.contains("cache_expiry"));
    }
}
