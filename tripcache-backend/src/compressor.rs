//! Payload compression.
//!
//! Entries carry no flag saying whether they were compressed. Instead
//! [`decompress`] sniffs the two-byte gzip signature and only inflates
//! payloads that start with it. Both compressors decompress through that
//! function, so an instance configured without compression still reads
//! entries written by a compressing instance, and the other way around.

use std::borrow::Cow;
use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use thiserror::Error;

/// Leading bytes of every gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Error type for compression operations.
#[derive(Debug, Error)]
pub enum CompressionError {
    /// Compressing the payload failed.
    #[error("compression failed: {0}")]
    Compress(#[source] std::io::Error),
    /// The payload looked like gzip but could not be inflated.
    #[error("decompression failed: {0}")]
    Decompress(#[source] std::io::Error),
}

/// Strategy used to compress payloads before they are stored.
pub trait Compressor: Send + Sync {
    /// Compresses `data`.
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError>;

    /// Restores a payload produced by any compressor.
    fn decompress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>, CompressionError> {
        decompress(data)
    }
}

/// Stores payloads as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCompressor;

impl Compressor for PassthroughCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        Ok(data.to_vec())
    }
}

/// Gzip compression, best compression level unless configured otherwise.
#[derive(Debug, Clone, Copy)]
pub struct GzipCompressor {
    level: Compression,
}

impl GzipCompressor {
    /// Creates a compressor with the given level (0-9).
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }
}

impl Default for GzipCompressor {
    fn default() -> Self {
        Self {
            level: Compression::best(),
        }
    }
}

impl Compressor for GzipCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), self.level);
        encoder.write_all(data).map_err(CompressionError::Compress)?;
        encoder.finish().map_err(CompressionError::Compress)
    }
}

/// Returns `true` if `data` starts with the gzip signature.
pub fn is_compressed(data: &[u8]) -> bool {
    data.len() >= GZIP_MAGIC.len() && data[..GZIP_MAGIC.len()] == GZIP_MAGIC
}

/// Inflates gzip payloads and returns anything else unchanged.
pub fn decompress(data: &[u8]) -> Result<Cow<'_, [u8]>, CompressionError> {
    if !is_compressed(data) {
        return Ok(Cow::Borrowed(data));
    }
    let mut decoded = Vec::with_capacity(data.len() * 2);
    GzDecoder::new(data)
        .read_to_end(&mut decoded)
        .map_err(CompressionError::Decompress)?;
    Ok(Cow::Owned(decoded))
}
