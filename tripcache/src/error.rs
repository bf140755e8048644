use thiserror::Error;
use tripcache_backend::{BackendError, CompressionError};
use tripcache_http::CodecError;

/// Failure raised by the caching transport itself.
///
/// Reaches callers wrapped in [`tripcache_core::Error::Cache`]; use
/// [`tripcache_core::Error::downcast_cache`] to get it back.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The storage backend failed on read or write.
    #[error("cache backend error: {0}")]
    Backend(#[from] BackendError),

    /// A response could not be dumped, or a stored dump could not be hydrated.
    #[error("cache codec error: {0}")]
    Codec(#[from] CodecError),

    /// A stored payload could not be compressed or decompressed.
    #[error("cache compression error: {0}")]
    Compression(#[from] CompressionError),
}

impl From<CacheError> for tripcache_core::Error {
    fn from(error: CacheError) -> Self {
        tripcache_core::Error::cache(error)
    }
}
