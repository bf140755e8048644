#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! # tripcache-moka
//!
//! Local, bounded, frequency-aware storage for tripcache built on
//! [Moka](https://docs.rs/moka). Entries expire after the TTL they were
//! written with; capacity is bounded by entry count (TinyLFU admission by
//! default) or by approximate byte size.
//!
//! ```
//! use tripcache_moka::MokaBackend;
//!
//! let backend = MokaBackend::builder().max_entries(10_000).build();
//! ```

mod backend;
mod builder;

pub use backend::{Entry, MokaBackend};
pub use builder::{ByteCapacity, EntryCapacity, MokaBackendBuilder, NoCapacity};
pub use moka::policy::EvictionPolicy;
