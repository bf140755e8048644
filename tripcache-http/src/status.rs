//! Marker header telling callers whether a response came from the cache.

use http::{HeaderName, HeaderValue};
use tripcache_core::Response;

/// Default marker header name.
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-http-cache");

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Replayed from storage.
    Hit,
    /// Fetched from upstream and stored.
    Miss,
}

impl CacheStatus {
    /// Header value for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }

    fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}

/// Stamps a [`CacheStatus`] onto a response.
pub trait CacheStatusExt {
    /// Sets `header` to the value of `status`, replacing any previous value.
    fn cache_status(&mut self, status: CacheStatus, header: &HeaderName);
}

impl CacheStatusExt for Response {
    fn cache_status(&mut self, status: CacheStatus, header: &HeaderName) {
        self.headers_mut().insert(header.clone(), status.header_value());
    }
}

/// Reports whether `response` was replayed from the cache.
///
/// Only the default marker header is inspected, and only the exact value
/// `HIT` counts. Transports configured with another header name are checked
/// with [`is_cached_response_with`].
pub fn is_cached_response(response: &Response) -> bool {
    is_cached_response_with(response, &CACHE_STATUS_HEADER)
}

/// Reports whether `response` carries `HIT` in the marker header `header`.
pub fn is_cached_response_with(response: &Response, header: &HeaderName) -> bool {
    response
        .headers()
        .get(header)
        .is_some_and(|value| value == CacheStatus::Hit.as_str())
}
