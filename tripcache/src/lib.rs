#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! # tripcache
//!
//! Client-side HTTP caching as a transport decorator.
//!
//! A [`CacheTransport`] wraps any [`Transport`]. Eligible requests (by default
//! `GET` and `HEAD` without a `Range` header) are answered from a
//! [`Backend`](tripcache_backend::Backend) when a stored response exists, and
//! otherwise forwarded, dumped and stored for a fixed TTL. Responses carry an
//! `x-http-cache: HIT` or `x-http-cache: MISS` marker header.
//!
//! Decorators are composed with a [`Chain`]: layers are registered outermost
//! first, so header injection registered before the cache layer runs before
//! the cache decides eligibility.
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use tripcache::{CacheConfig, CacheLayer, Chain};
//! use tripcache::middleware::HeaderLayer;
//! use tripcache_core::{Body, Response, transport_fn};
//! # use tripcache_backend::{Backend, BackendResult, DeleteStatus};
//! # struct NoStore;
//! # #[async_trait::async_trait]
//! # impl Backend for NoStore {
//! #     async fn get(&self, _: &str) -> BackendResult<Option<bytes::Bytes>> { Ok(None) }
//! #     async fn set(&self, _: &str, _: bytes::Bytes, _: Duration) -> BackendResult<()> { Ok(()) }
//! #     async fn delete(&self, _: &str) -> BackendResult<DeleteStatus> { Ok(DeleteStatus::Missing) }
//! # }
//!
//! let base = transport_fn(|_request| async { Ok(Response::new(Body::from("hello world"))) });
//! let config = CacheConfig::builder()
//!     .ttl(Duration::from_secs(60))
//!     .compression(true)
//!     .build();
//!
//! let chain = Chain::new(base)
//!     .layer(HeaderLayer::new(
//!         http::header::USER_AGENT,
//!         http::HeaderValue::from_static("tripcache"),
//!     ))
//!     .layer(CacheLayer::with_config(Arc::new(NoStore), config));
//! assert_eq!(chain.len(), 2);
//! ```

pub mod chain;
pub mod config;
mod error;
pub mod middleware;
mod transport;

pub use chain::{Chain, Layer};
pub use config::{CacheConfig, CacheConfigBuilder, CacheSettings, DEFAULT_TTL};
pub use error::CacheError;
pub use transport::{CacheLayer, CacheTransport};

pub use tripcache_core::{
    Body, BoxTransport, Error, Request, Response, RoundTripContext, Transport, transport_fn,
};
pub use tripcache_http::{
    CACHE_STATUS_HEADER, CacheStatus, is_cached_response, is_cached_response_with,
};
