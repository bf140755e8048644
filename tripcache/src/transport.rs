//! The caching transport decorator.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, trace};
use tripcache_backend::Backend;
use tripcache_core::{BoxTransport, Error, Request, Response, RoundTripContext, Transport};
use tripcache_http::{CacheStatus, CacheStatusExt, codec};

use crate::chain::Layer;
use crate::config::CacheConfig;
use crate::error::CacheError;

/// Serves eligible requests from a [`Backend`] and stores what it fetches.
///
/// Per round trip:
///
/// 1. Ineligible requests (predicate rejects them, or the TTL is zero) go
///    straight to the inner transport without touching storage.
/// 2. A stored payload is decompressed, hydrated against the request and
///    returned with the marker header set to `HIT`. The inner transport is
///    not called.
/// 3. Otherwise the inner transport is called, its response is dumped,
///    compressed when configured and stored for the configured TTL, then
///    returned with the marker header set to `MISS`.
///
/// Storage and codec failures abort the round trip with
/// [`Error::Cache`]; they never fall through to a live request. Inner
/// transport errors are returned unchanged and nothing is stored.
///
/// Storage calls and the inner call are raced against the
/// [`RoundTripContext`] attached to the request.
pub struct CacheTransport<T, B: ?Sized> {
    next: T,
    backend: Arc<B>,
    config: Arc<CacheConfig>,
}

impl<T, B: ?Sized> CacheTransport<T, B> {
    /// Wraps `next` with the default configuration.
    pub fn new(next: T, backend: Arc<B>) -> Self {
        Self::with_config(next, backend, CacheConfig::default())
    }

    /// Wraps `next` with `config`.
    pub fn with_config(next: T, backend: Arc<B>, config: CacheConfig) -> Self {
        Self {
            next,
            backend,
            config: Arc::new(config),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the storage backend.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }
}

impl<T, B> CacheTransport<T, B>
where
    T: Transport,
    B: Backend + ?Sized,
{
    async fn lookup(
        &self,
        context: &RoundTripContext,
        key: &str,
        request: &Request,
    ) -> Result<Option<Response>, Error> {
        trace!(backend = self.backend.name(), key, "backend get");
        let payload = context
            .run(self.backend.get(key))
            .await?
            .map_err(CacheError::from)?;

        let payload = match payload {
            Some(payload) if !payload.is_empty() => payload,
            _ => {
                debug!(key, "cache miss");
                return Ok(None);
            }
        };

        let dumped = self
            .config
            .compressor()
            .decompress(&payload)
            .map_err(CacheError::from)?;
        let mut response = codec::hydrate(request, &dumped).map_err(CacheError::from)?;
        response.cache_status(CacheStatus::Hit, self.config.status_header());

        debug!(key, size = payload.len(), status = %response.status(), "cache hit");
        Ok(Some(response))
    }

    async fn store(
        &self,
        context: &RoundTripContext,
        key: &str,
        response: Response,
    ) -> Result<Response, Error> {
        let (mut response, dumped) = context
            .run(codec::dump(response))
            .await?
            .map_err(CacheError::from)?;
        let payload = self
            .config
            .compressor()
            .compress(&dumped)
            .map_err(CacheError::from)?;
        let size = payload.len();
        let ttl = self.config.ttl();

        trace!(backend = self.backend.name(), key, size, "backend set");
        context
            .run(self.backend.set(key, Bytes::from(payload), ttl))
            .await?
            .map_err(CacheError::from)?;

        response.cache_status(CacheStatus::Miss, self.config.status_header());
        debug!(key, dump = dumped.len(), size, ?ttl, "stored response");
        Ok(response)
    }
}

#[async_trait]
impl<T, B> Transport for CacheTransport<T, B>
where
    T: Transport,
    B: Backend + ?Sized,
{
    async fn round_trip(&self, request: Request) -> Result<Response, Error> {
        if !self.config.is_cacheable(&request) {
            debug!(method = %request.method(), uri = %request.uri(), "request not cacheable");
            return self.next.round_trip(request).await;
        }

        let context = RoundTripContext::of(&request);
        let key = self.config.key(&request);

        if let Some(response) = self.lookup(&context, &key, &request).await? {
            return Ok(response);
        }

        let response = context.run(self.next.round_trip(request)).await??;
        self.store(&context, &key, response).await
    }
}

/// Chain layer wrapping the next transport in a [`CacheTransport`].
///
/// Every transport built by the layer shares the same backend and config.
pub struct CacheLayer<B: ?Sized> {
    backend: Arc<B>,
    config: Arc<CacheConfig>,
}

impl<B: ?Sized> CacheLayer<B> {
    /// Creates a layer with the default configuration.
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_config(backend, CacheConfig::default())
    }

    /// Creates a layer with `config`.
    pub fn with_config(backend: Arc<B>, config: CacheConfig) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }
}

impl<B: ?Sized> Clone for CacheLayer<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: Arc::clone(&self.config),
        }
    }
}

impl<B> Layer for CacheLayer<B>
where
    B: Backend + ?Sized + 'static,
{
    fn layer(&self, next: BoxTransport) -> BoxTransport {
        Arc::new(CacheTransport {
            next,
            backend: Arc::clone(&self.backend),
            config: Arc::clone(&self.config),
        })
    }
}
