//! General purpose chain layers.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::{Instrument, debug, debug_span, field};
use tripcache_core::{BoxTransport, Error, Request, Response, Transport};

use crate::chain::Layer;

/// Sets request headers before passing the request on.
///
/// Headers already present on the request under the same name are replaced.
#[derive(Debug, Clone, Default)]
pub struct HeaderLayer {
    headers: HeaderMap,
}

impl HeaderLayer {
    /// Creates a layer setting a single header.
    pub fn new(name: HeaderName, value: HeaderValue) -> Self {
        Self::default().header(name, value)
    }

    /// Adds another header. Repeating a name sends every value.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }
}

impl From<HeaderMap> for HeaderLayer {
    fn from(headers: HeaderMap) -> Self {
        Self { headers }
    }
}

impl Layer for HeaderLayer {
    fn layer(&self, next: BoxTransport) -> BoxTransport {
        Arc::new(HeaderTransport {
            next,
            headers: self.headers.clone(),
        })
    }
}

struct HeaderTransport {
    next: BoxTransport,
    headers: HeaderMap,
}

#[async_trait]
impl Transport for HeaderTransport {
    async fn round_trip(&self, mut request: Request) -> Result<Response, Error> {
        let headers = request.headers_mut();
        for name in self.headers.keys() {
            headers.remove(name);
        }
        for (name, value) in self.headers.iter() {
            headers.append(name.clone(), value.clone());
        }
        self.next.round_trip(request).await
    }
}

/// Records every round trip in a `round_trip` tracing span.
///
/// The span carries the method and URI; status and elapsed time are
/// recorded once the response arrives.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceLayer;

impl Layer for TraceLayer {
    fn layer(&self, next: BoxTransport) -> BoxTransport {
        Arc::new(TraceTransport { next })
    }
}

struct TraceTransport {
    next: BoxTransport,
}

#[async_trait]
impl Transport for TraceTransport {
    async fn round_trip(&self, request: Request) -> Result<Response, Error> {
        let span = debug_span!(
            "round_trip",
            method = %request.method(),
            uri = %request.uri(),
            status = field::Empty,
        );
        let started = Instant::now();

        let result = self.next.round_trip(request).instrument(span.clone()).await;
        let elapsed = started.elapsed();
        span.in_scope(|| match &result {
            Ok(response) => {
                span.record("status", response.status().as_u16());
                debug!(?elapsed, "round trip finished");
            }
            Err(error) => debug!(?elapsed, %error, "round trip failed"),
        });
        result
    }
}
