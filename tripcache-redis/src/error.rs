//! Error types for Redis backend operations.
//!
//! Every [`Error`] converts into [`BackendError`], so the caching transport
//! reports Redis failures like any other storage failure.
//!
//! [`BackendError`]: tripcache_backend::BackendError

use redis::RedisError;
use tripcache_backend::BackendError;

/// Error type for Redis backend operations.
///
/// Appears when [`RedisBackendBuilder::build`] is given an invalid URL, when
/// the first operation cannot reach the server (connections are opened
/// lazily), or when the server rejects a command.
///
/// [`RedisBackendBuilder::build`]: crate::RedisBackendBuilder::build
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying Redis client.
    #[error("Redis backend error: {0}")]
    Redis(#[from] RedisError),
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        let Error::Redis(inner) = &error;
        if inner.is_io_error() || inner.is_connection_refusal() {
            Self::ConnectionError(Box::new(error))
        } else {
            Self::InternalError(Box::new(error))
        }
    }
}
