//! Tower middleware layers for the izzi HTTP transport.
//!
//! Layers wrap the type-erased transport service built by
//! [`HyperTransportBuilder`](crate::HyperTransportBuilder). The first layer
//! added is the outermost one.
//!
//! # Available Layers
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//! - [`ConcurrencyLimitLayer`] - Limits concurrent requests (from tower)
//!
//! # Example
//!
//! ```ignore
//! use izzi::HyperTransport;
//! use izzi::middleware::ConcurrencyLimitLayer;
//!
//! let transport = HyperTransport::builder()
//!     .with_logging()
//!     .layer(ConcurrencyLimitLayer::new(8))
//!     .build();
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::limit::ConcurrencyLimitLayer;
pub use tower::{Layer, ServiceBuilder};
