//! Transport-level HTTP requests.
//!
//! A [`Request`] is what the pipeline hands to a [`crate::Transport`]: the
//! URL is already validated and the body already encoded.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use izzi_core::{Method, Request};
//!
//! let request = Request::builder(Method::Get, "https://api.example.com".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .timeout(Duration::from_secs(5))
//!     .build();
//! assert_eq!(request.cache_key(), "https://api.example.com/");
//! ```

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use url::Url;

use crate::{EncodedBody, Method};

/// An HTTP request with method, URL, headers, optional body and timeout.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
    timeout: Option<Duration>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Key under which the response to this request is cached.
    #[must_use]
    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }

    /// Request headers, keyed by lowercase name.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Time allowed for the exchange, if set.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, HashMap<String, String>, Option<Bytes>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
    timeout: Option<Duration>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Sets a header, replacing any value already set under the same name
    /// in any letter case.
    ///
    /// Names are stored in ASCII lowercase.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut name = name.into();
        name.make_ascii_lowercase();
        self.headers.insert(name, value.into());
        self
    }

    /// Sets multiple headers.
    ///
    /// When `headers` holds several spellings of one name, a single entry
    /// is kept with the value seen last in iteration order.
    #[must_use]
    pub fn headers(self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }

    /// Sets a raw body without touching the headers.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets an encoded body and its `content-type`, replacing any value the
    /// caller set.
    #[must_use]
    pub fn encoded_body(self, body: EncodedBody) -> Self {
        let (bytes, content_type) = body.into_parts();
        let mut builder = self.header("content-type", content_type.as_str());
        builder.body = Some(bytes);
        builder
    }

    /// Sets the time allowed for the exchange.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Body, encode_body};

    fn url() -> Url {
        Url::parse("https://api.example.com/users").expect("valid URL")
    }

    #[test]
    fn request_builder_basic() {
        let request = Request::builder(Method::Get, url())
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(3))
            .build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().as_str(), "https://api.example.com/users");
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.timeout(), Some(Duration::from_secs(3)));
        assert!(request.body().is_none());
    }

    #[test]
    fn cache_key_is_canonical_url() {
        let url = Url::parse("HTTPS://API.Example.com:443/users?page=1").expect("valid URL");
        let request = Request::builder(Method::Get, url).build();
        assert_eq!(request.cache_key(), "https://api.example.com/users?page=1");
    }

    #[test]
    fn encoded_body_sets_content_type() {
        let encoded = encode_body::<()>(Some(Body::binary(vec![1, 2, 3])), true)
            .expect("encode")
            .expect("body");
        let request = Request::builder(Method::Put, url())
            .header("content-type", "text/plain")
            .header("X-Trace", "abc")
            .encoded_body(encoded)
            .build();

        assert_eq!(request.headers().len(), 2);
        assert_eq!(
            request.header("Content-Type"),
            Some("application/octet-stream")
        );
        assert_eq!(request.body(), Some(&Bytes::from_static(&[1, 2, 3])));
    }

    #[test]
    fn header_names_are_case_insensitive() {
        let request = Request::builder(Method::Get, url())
            .header("Accept", "text/plain")
            .header("ACCEPT", "application/json")
            .build();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(
            request.headers().get("accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn header_map_with_duplicate_spellings_keeps_one_entry() {
        let headers = HashMap::from([
            ("Accept".to_string(), "text/plain".to_string()),
            ("accept".to_string(), "application/json".to_string()),
            ("X-Trace".to_string(), "abc".to_string()),
        ]);
        let request = Request::builder(Method::Get, url()).headers(headers).build();

        assert_eq!(request.headers().len(), 2);
        assert!(matches!(
            request.header("Accept"),
            Some("text/plain" | "application/json")
        ));
        assert_eq!(request.headers().get("x-trace").map(String::as_str), Some("abc"));
    }

    #[test]
    fn into_parts() {
        let request = Request::builder(Method::Post, url())
            .body("payload")
            .build();
        let (method, url, headers, body) = request.into_parts();

        assert_eq!(method, Method::Post);
        assert_eq!(url.path(), "/users");
        assert!(headers.is_empty());
        assert_eq!(body, Some(Bytes::from("payload")));
    }
}
