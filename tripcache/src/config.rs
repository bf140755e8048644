//! Caching transport configuration.
//!
//! [`CacheConfig`] is assembled with [`CacheConfig::builder`] in code, or
//! loaded from YAML/JSON as [`CacheSettings`] and turned into a builder when
//! the predicate or key extractor still need to be set programmatically.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::HeaderName;
use http::header::InvalidHeaderName;
use serde::{Deserialize, Serialize};
use tripcache_backend::{Compressor, GzipCompressor, PassthroughCompressor};
use tripcache_core::{Request, Response};
use tripcache_http::{
    CACHE_STATUS_HEADER, DefaultPredicate, KeyExtractor, RequestPredicate, Sha1Key,
    is_cached_response_with,
};

/// TTL used when none is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Immutable settings of one caching transport.
#[derive(Clone)]
pub struct CacheConfig {
    ttl: Duration,
    predicate: Arc<dyn RequestPredicate>,
    key_extractor: Arc<dyn KeyExtractor>,
    compressor: Arc<dyn Compressor>,
    status_header: HeaderName,
}

impl CacheConfig {
    /// Creates a new [`CacheConfigBuilder`].
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::new()
    }

    /// How long stored responses live. Zero disables caching.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Name of the marker header stamped on cached and stored responses.
    pub fn status_header(&self) -> &HeaderName {
        &self.status_header
    }

    /// Compressor applied to dumps before they are stored.
    pub fn compressor(&self) -> &dyn Compressor {
        self.compressor.as_ref()
    }

    /// Whether `request` takes part in caching at all.
    pub fn is_cacheable(&self, request: &Request) -> bool {
        !self.ttl.is_zero() && self.predicate.is_cacheable(request)
    }

    /// Storage key of `request`.
    pub fn key(&self, request: &Request) -> String {
        self.key_extractor.extract(request)
    }

    /// Whether `response` was marked as a hit by a transport using this config.
    pub fn is_cached(&self, response: &Response) -> bool {
        is_cached_response_with(response, &self.status_header)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfigBuilder::new().build()
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("ttl", &self.ttl)
            .field("predicate", &"...")
            .field("key_extractor", &"...")
            .field("compressor", &"...")
            .field("status_header", &self.status_header)
            .finish()
    }
}

/// Builder for [`CacheConfig`].
///
/// Every field has a default: a 30 second TTL, the GET/HEAD-without-Range
/// predicate, SHA-1 keys, no compression and the `x-http-cache` header.
#[must_use]
pub struct CacheConfigBuilder {
    ttl: Duration,
    predicate: Arc<dyn RequestPredicate>,
    key_extractor: Arc<dyn KeyExtractor>,
    compressor: Arc<dyn Compressor>,
    status_header: HeaderName,
}

impl CacheConfigBuilder {
    /// Creates a builder holding the defaults.
    pub fn new() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            predicate: Arc::new(DefaultPredicate),
            key_extractor: Arc::new(Sha1Key),
            compressor: Arc::new(PassthroughCompressor),
            status_header: CACHE_STATUS_HEADER,
        }
    }

    /// Sets the TTL of stored responses. Zero disables caching entirely.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the eligibility predicate.
    pub fn predicate(mut self, predicate: impl RequestPredicate + 'static) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Sets the key extractor.
    pub fn key_extractor(mut self, extractor: impl KeyExtractor + 'static) -> Self {
        self.key_extractor = Arc::new(extractor);
        self
    }

    /// Gzip-compresses stored dumps at the best compression level.
    ///
    /// Reads sniff the payload, so entries written with and without
    /// compression stay readable either way.
    pub fn compression(mut self, enabled: bool) -> Self {
        self.compressor = if enabled {
            Arc::new(GzipCompressor::default())
        } else {
            Arc::new(PassthroughCompressor)
        };
        self
    }

    /// Sets a custom compressor.
    pub fn compressor(mut self, compressor: impl Compressor + 'static) -> Self {
        self.compressor = Arc::new(compressor);
        self
    }

    /// Sets the marker header name.
    pub fn status_header(mut self, name: HeaderName) -> Self {
        self.status_header = name;
        self
    }

    /// Builds the [`CacheConfig`].
    pub fn build(self) -> CacheConfig {
        CacheConfig {
            ttl: self.ttl,
            predicate: self.predicate,
            key_extractor: self.key_extractor,
            compressor: self.compressor,
            status_header: self.status_header,
        }
    }
}

impl Default for CacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable part of a [`CacheConfig`].
///
/// ```yaml
/// ttl: 1m 30s
/// compression: true
/// status_header: x-cache
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct CacheSettings {
    /// Time-to-live of stored responses (e.g. "30s", "500ms", "1m").
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    /// Whether stored dumps are gzip-compressed.
    pub compression: bool,
    /// Marker header name.
    pub status_header: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            compression: false,
            status_header: CACHE_STATUS_HEADER.as_str().to_owned(),
        }
    }
}

impl TryFrom<CacheSettings> for CacheConfigBuilder {
    type Error = InvalidHeaderName;

    fn try_from(settings: CacheSettings) -> Result<Self, Self::Error> {
        let status_header = HeaderName::try_from(settings.status_header)?;
        Ok(CacheConfigBuilder::new()
            .ttl(settings.ttl)
            .compression(settings.compression)
            .status_header(status_header))
    }
}

impl TryFrom<CacheSettings> for CacheConfig {
    type Error = InvalidHeaderName;

    fn try_from(settings: CacheSettings) -> Result<Self, Self::Error> {
        CacheConfigBuilder::try_from(settings).map(CacheConfigBuilder::build)
    }
}
