//! Error returned by every transport in a chain.

use thiserror::Error;

use crate::BoxError;

/// Failure of a single round trip.
///
/// Errors raised by the network transport and errors raised by caching
/// layers travel through the same chain, so they share this type. Callers
/// that need the concrete cause use [`Error::downcast_cache`] or walk the
/// [`std::error::Error::source`] chain.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying transport failed to produce a response.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// A caching layer failed to read or persist a response.
    #[error("cache error: {0}")]
    Cache(#[source] BoxError),

    /// The round trip was cancelled by the caller.
    #[error("round trip cancelled")]
    Cancelled,

    /// The round trip did not finish before its deadline.
    #[error("round trip deadline exceeded")]
    DeadlineExceeded,
}

impl Error {
    /// Wraps an underlying transport failure.
    pub fn transport(error: impl Into<BoxError>) -> Self {
        Error::Transport(error.into())
    }

    /// Wraps a caching layer failure.
    pub fn cache(error: impl Into<BoxError>) -> Self {
        Error::Cache(error.into())
    }

    /// Returns the cache error as `E`, if this is a cache failure of that type.
    pub fn downcast_cache<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Error::Cache(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Returns `true` when the caller cancelled the round trip or its deadline passed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled | Error::DeadlineExceeded)
    }
}
