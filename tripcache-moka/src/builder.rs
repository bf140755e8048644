//! Builder for configuring [`MokaBackend`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::{Cache, CacheBuilder};
use moka::notification::RemovalCause;
use moka::policy::EvictionPolicy;
use tracing::trace;

use crate::backend::{Entry, MokaBackend};

// Approximate per-entry bookkeeping cost counted against a byte budget.
const ENTRY_OVERHEAD: usize = 112;

/// Expires every entry after the TTL it was written with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl())
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // Moka keeps the old deadline by default; an overwrite restarts the clock.
        Some(value.ttl())
    }
}

fn log_removal(key: Arc<String>, _entry: Entry, cause: RemovalCause) {
    trace!(key = %key, ?cause, "moka entry removed");
}

/// Marker type: capacity has not been configured yet.
///
/// Call [`max_entries()`](MokaBackendBuilder::max_entries) or
/// [`max_bytes()`](MokaBackendBuilder::max_bytes) before `build()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapacity;

/// Marker type: the cache holds at most this many entries.
#[derive(Debug, Clone, Copy)]
pub struct EntryCapacity(pub(crate) u64);

/// Marker type: the cache holds approximately this many bytes.
#[derive(Debug, Clone, Copy)]
pub struct ByteCapacity(pub(crate) u64);

/// Builder for a [`MokaBackend`].
///
/// Capacity is required and set exactly once, either by entry count or by
/// byte budget; `build()` only exists once it is set.
///
/// ```
/// use tripcache_moka::{EvictionPolicy, MokaBackend};
///
/// let by_count = MokaBackend::builder().max_entries(10_000).build();
///
/// let by_size = MokaBackend::builder()
///     .max_bytes(64 * 1024 * 1024)
///     .eviction_policy(EvictionPolicy::tiny_lfu())
///     .name("responses")
///     .build();
/// ```
pub struct MokaBackendBuilder<Cap> {
    capacity: Cap,
    name: &'static str,
    eviction_policy: Option<EvictionPolicy>,
}

impl MokaBackendBuilder<NoCapacity> {
    /// Creates a builder with no capacity configured.
    pub fn new() -> Self {
        Self {
            capacity: NoCapacity,
            name: "moka",
            eviction_policy: None,
        }
    }

    /// Limits the cache by number of entries.
    pub fn max_entries(self, capacity: u64) -> MokaBackendBuilder<EntryCapacity> {
        MokaBackendBuilder {
            capacity: EntryCapacity(capacity),
            name: self.name,
            eviction_policy: self.eviction_policy,
        }
    }

    /// Limits the cache by approximate memory use.
    ///
    /// Each entry weighs its key and payload length plus a fixed overhead.
    pub fn max_bytes(self, bytes: u64) -> MokaBackendBuilder<ByteCapacity> {
        MokaBackendBuilder {
            capacity: ByteCapacity(bytes),
            name: self.name,
            eviction_policy: self.eviction_policy,
        }
    }
}

impl Default for MokaBackendBuilder<NoCapacity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cap> MokaBackendBuilder<Cap> {
    /// Sets the name reported in logs. Defaults to `"moka"`.
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Overrides the eviction policy.
    ///
    /// Defaults to [`EvictionPolicy::tiny_lfu()`] for entry-count capacity and
    /// [`EvictionPolicy::lru()`] for byte capacity, where TinyLFU admission
    /// could reject large entries even when eviction would make room.
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = Some(policy);
        self
    }
}

impl MokaBackendBuilder<EntryCapacity> {
    /// Builds the backend.
    pub fn build(self) -> MokaBackend {
        let policy = self.eviction_policy.unwrap_or_else(EvictionPolicy::tiny_lfu);
        let cache: Cache<String, Entry> = CacheBuilder::new(self.capacity.0)
            .eviction_policy(policy)
            .expire_after(PerEntryTtl)
            .eviction_listener(log_removal)
            .build();

        MokaBackend {
            cache,
            name: self.name,
        }
    }
}

impl MokaBackendBuilder<ByteCapacity> {
    /// Builds the backend.
    pub fn build(self) -> MokaBackend {
        let policy = self.eviction_policy.unwrap_or_else(EvictionPolicy::lru);
        let cache: Cache<String, Entry> = CacheBuilder::new(self.capacity.0)
            .weigher(byte_weigher)
            .eviction_policy(policy)
            .expire_after(PerEntryTtl)
            .eviction_listener(log_removal)
            .build();

        MokaBackend {
            cache,
            name: self.name,
        }
    }
}

fn byte_weigher(key: &String, entry: &Entry) -> u32 {
    let size = key.len() + entry.payload().len() + ENTRY_OVERHEAD;
    u32::try_from(size).unwrap_or(u32::MAX)
}
