#![warn(missing_docs)]
//! Storage contract for the tripcache HTTP client cache.
//!
//! The caching transport only ever talks to storage through [`Backend`]:
//! `get`, `set` with a TTL, and `delete`, all keyed by opaque strings and
//! holding opaque bytes. Concrete stores live in their own crates
//! (`tripcache-moka` for a local TinyLFU store, `tripcache-redis` for a
//! shared remote store) and are picked when the transport is built.
//!
//! Payload compression is also defined here, see [`compressor`].
mod backend;
pub mod composition;
pub mod compressor;
mod error;

pub use backend::{Backend, BackendResult};
pub use composition::{Compose, CompositionBackend, CompositionError};
pub use compressor::{
    CompressionError, Compressor, GZIP_MAGIC, GzipCompressor, PassthroughCompressor,
};
pub use error::{BackendError, DeleteStatus};
