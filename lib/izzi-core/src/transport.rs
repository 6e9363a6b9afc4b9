//! Transport trait.
//!
//! A [`Transport`] performs the network exchange for one [`Request`]. The
//! runtime crate provides a hyper-based implementation; tests usually provide
//! an in-memory one.

use std::future::Future;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Performs a single HTTP exchange.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use std::future::Future;
/// use izzi_core::{Request, Response, Result, Transport};
///
/// /// Answers every request with an empty JSON object.
/// #[derive(Debug, Clone)]
/// struct EmptyObject;
///
/// impl Transport for EmptyObject {
///     fn execute(&self, _request: Request) -> impl Future<Output = Result<Response>> + Send {
///         async { Ok(Response::new(200, HashMap::new(), "{}")) }
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Execute a request and return the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TransportFailure`] when no interpretable
    /// response was received, or [`crate::Error::Timeout`] if the transport
    /// enforces [`Request::timeout`] itself.
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        T::execute(self, request)
    }
}
