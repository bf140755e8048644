#![warn(missing_docs)]
//! # tripcache-http
//!
//! HTTP plumbing for the tripcache client cache:
//!
//! - [`codec`] turns a response into its HTTP/1.x wire dump and back
//! - [`key`] derives storage keys from requests
//! - [`predicates`] decide which requests may use the cache
//! - [`status`] stamps and reads the `x-http-cache` marker header

pub mod codec;
pub mod key;
pub mod predicates;
pub mod status;

pub use codec::{CodecError, dump, encode, hydrate};
pub use key::{CACHE_KEY_PREFIX, KeyExtractor, Sha1Key, cache_key};
pub use predicates::{DefaultPredicate, PredicateExt, RequestPredicate};
pub use status::{
    CACHE_STATUS_HEADER, CacheStatus, CacheStatusExt, is_cached_response, is_cached_response_with,
};
