#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! # tripcache-redis
//!
//! Remote storage for tripcache backed by Redis. Responses written by one
//! process are served to every other process sharing the server.

pub mod backend;
pub mod error;

#[doc(inline)]
pub use crate::backend::{RedisBackend, RedisBackendBuilder};
#[doc(inline)]
pub use crate::error::Error;
