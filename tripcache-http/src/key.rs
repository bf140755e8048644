//! Cache key derivation.
//!
//! The default key is `httpcache:<METHOD>:<hex sha1 of the url>`, path-escaped
//! so it is safe to use as a storage key on any backend.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::{Digest, Sha1};
use tripcache_core::Request;

/// Prefix of every key produced by [`cache_key`].
pub const CACHE_KEY_PREFIX: &str = "httpcache:";

// Characters that survive path-segment escaping untouched.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// Derives the default storage key for `request`.
///
/// Only the method and the full URL take part; headers never do.
pub fn cache_key(request: &Request) -> String {
    let digest = Sha1::digest(request.uri().to_string().as_bytes());
    let raw = format!(
        "{CACHE_KEY_PREFIX}{}:{}",
        request.method(),
        hex::encode(digest)
    );
    utf8_percent_encode(&raw, PATH_SEGMENT).to_string()
}

/// Strategy turning a request into a storage key.
pub trait KeyExtractor: Send + Sync {
    /// Returns the storage key for `request`.
    fn extract(&self, request: &Request) -> String;
}

impl<F> KeyExtractor for F
where
    F: Fn(&Request) -> String + Send + Sync,
{
    fn extract(&self, request: &Request) -> String {
        self(request)
    }
}

/// The default [`KeyExtractor`], see [`cache_key`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1Key;

impl KeyExtractor for Sha1Key {
    fn extract(&self, request: &Request) -> String {
        cache_key(request)
    }
}
