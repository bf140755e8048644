//! Error types for backend operations.

use thiserror::Error;

use crate::compressor::CompressionError;

/// Error type for backend operations.
///
/// A missing entry is not an error: [`Backend::get`](crate::Backend::get)
/// reports it as `Ok(None)`. Everything in this enum is a real failure.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal backend error, state or computation error.
    ///
    /// Any error not related to network interaction.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send + Sync>),

    /// Network interaction error.
    ///
    /// Errors occurring during communication with remote backends (e.g., Redis).
    #[error(transparent)]
    ConnectionError(Box<dyn std::error::Error + Send + Sync>),

    /// Compression or decompression error.
    #[error(transparent)]
    CompressionError(#[from] CompressionError),
}

/// Status of deleting result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record successfully deleted.
    Deleted(u32),
    /// Record already missing.
    Missing,
}
