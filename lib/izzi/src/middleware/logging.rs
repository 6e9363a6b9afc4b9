//! Exchange logging middleware.
//!
//! Every request handed to the transport is logged with its timeout,
//! outgoing `content-type` and body size; the outcome is logged with the
//! status, elapsed time and response body size. Failures are always logged
//! at `WARN`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{Error, Request, Response, Result};

/// How much of each exchange is logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Summary at `INFO`.
    #[default]
    Info,
    /// Summary at `DEBUG`, with the request headers.
    Debug,
}

/// Layer producing [`Logging`] services.
///
/// ```ignore
/// let transport = HyperTransport::builder()
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

impl LoggingLayer {
    /// Log exchange summaries at `INFO`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log exchange summaries and request headers at `DEBUG`.
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// Level this layer logs at.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service logging each exchange it forwards.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Logging<S> {
    /// Wrap `inner`, logging at `INFO`.
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            level: LogLevel::Info,
        }
    }
}

/// What is known about a request before it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Outgoing {
    timeout_ms: Option<u64>,
    content_type: Option<String>,
    body_len: usize,
}

impl Outgoing {
    fn of(request: &Request) -> Self {
        Self {
            timeout_ms: request.timeout().map(millis),
            content_type: request.header("content-type").map(str::to_string),
            body_len: request.body().map_or(0, |body| body.len()),
        }
    }

    fn log(&self, level: LogLevel, request: &Request) {
        let content_type = self.content_type.as_deref().unwrap_or("none");
        match level {
            LogLevel::Info => info!(
                timeout_ms = self.timeout_ms,
                content_type,
                body_len = self.body_len,
                "sending request"
            ),
            LogLevel::Debug => debug!(
                timeout_ms = self.timeout_ms,
                content_type,
                body_len = self.body_len,
                headers = ?request.headers(),
                "sending request"
            ),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn log_outcome(level: LogLevel, result: &Result<Response>, elapsed_ms: u64) {
    match result {
        Ok(response) if response.is_success() => {
            let status = response.status();
            let body_len = response.body().len();
            match level {
                LogLevel::Info => info!(status, elapsed_ms, body_len, "response received"),
                LogLevel::Debug => debug!(status, elapsed_ms, body_len, "response received"),
            }
        }
        Ok(response) => warn!(
            status = response.status(),
            elapsed_ms,
            body_len = response.body().len(),
            "response with error status"
        ),
        Err(err) => warn!(error = %err, elapsed_ms, "exchange failed"),
    }
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let span = info_span!("http_exchange", method = %request.method(), url = %request.url());
        let level = self.level;
        Outgoing::of(&request).log(level, &request);

        // the clone is not guaranteed ready; keep the one polled in poll_ready
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = inner.call(request).await;
                log_outcome(level, &result, millis(start.elapsed()));
                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use izzi_core::{Body, encode_body};
    use tower::ServiceExt;

    use super::*;
    use crate::Method;

    fn url() -> url::Url {
        url::Url::parse("https://api.example.com/users").expect("url")
    }

    #[test]
    fn layer_levels() {
        assert_eq!(LoggingLayer::new().level(), LogLevel::Info);
        assert_eq!(LoggingLayer::debug().level(), LogLevel::Debug);
    }

    #[test]
    fn outgoing_summary_of_a_body_request() {
        let encoded = encode_body(Some(Body::Structured(serde_json::json!({"a": 1}))), true)
            .expect("encode")
            .expect("body");
        let request = Request::builder(Method::Post, url())
            .timeout(Duration::from_millis(2500))
            .encoded_body(encoded)
            .build();

        assert_eq!(
            Outgoing::of(&request),
            Outgoing {
                timeout_ms: Some(2500),
                content_type: Some("application/json".to_string()),
                body_len: br#"{"a":1}"#.len(),
            }
        );
    }

    #[test]
    fn outgoing_summary_without_body_or_timeout() {
        let request = Request::builder(Method::Get, url()).build();

        assert_eq!(
            Outgoing::of(&request),
            Outgoing {
                timeout_ms: None,
                content_type: None,
                body_len: 0,
            }
        );
    }

    #[tokio::test]
    async fn error_status_is_passed_through() {
        let inner = tower::service_fn(|_request: Request| async {
            Ok::<_, Error>(Response::new(404, HashMap::new(), "missing"))
        });
        let service = LoggingLayer::debug().layer(inner);

        let request = Request::builder(Method::Get, url()).build();
        let response = service.oneshot(request).await.expect("response");
        assert_eq!(response.status(), 404);
        assert_eq!(response.body().as_ref(), b"missing");
    }

    #[tokio::test]
    async fn transport_error_is_passed_through() {
        let inner = tower::service_fn(|_request: Request| async {
            Err::<Response, _>(Error::transport("connection reset"))
        });
        let service = Logging::new(inner);

        let request = Request::builder(Method::Get, url())
            .timeout(Duration::from_secs(1))
            .build();
        let err = service.oneshot(request).await.expect_err("error");
        assert!(err.is_transport());
    }
}
