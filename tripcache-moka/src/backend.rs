//! Moka backend implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache;
use tripcache_backend::{Backend, BackendResult, DeleteStatus};

use crate::builder::{MokaBackendBuilder, NoCapacity};

/// Stored payload together with the TTL it was written with.
#[derive(Clone, Debug)]
pub struct Entry {
    payload: Bytes,
    ttl: Duration,
}

impl Entry {
    /// Stored bytes.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// TTL the entry was written with.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// In-memory storage powered by Moka.
///
/// Reads are lock-free; writes use fine-grained locking. Data is neither
/// persisted nor shared across processes, and expiry is best-effort:
/// an entry may stay readable briefly after its TTL until Moka's
/// maintenance runs.
#[derive(Clone)]
pub struct MokaBackend {
    pub(crate) cache: Cache<String, Entry>,
    pub(crate) name: &'static str,
}

impl MokaBackend {
    /// Creates a new [`MokaBackendBuilder`]. Capacity must be set before `build()`.
    pub fn builder() -> MokaBackendBuilder<NoCapacity> {
        MokaBackendBuilder::new()
    }

    /// Returns the underlying Moka cache.
    pub fn cache(&self) -> &Cache<String, Entry> {
        &self.cache
    }
}

impl std::fmt::Debug for MokaBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaBackend")
            .field("name", &self.name)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[async_trait]
impl Backend for MokaBackend {
    async fn get(&self, key: &str) -> BackendResult<Option<Bytes>> {
        Ok(self.cache.get(key).await.map(|entry| entry.payload))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        let entry = Entry {
            payload: value,
            ttl,
        };
        self.cache.insert(key.to_owned(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> BackendResult<DeleteStatus> {
        match self.cache.remove(key).await {
            Some(_) => Ok(DeleteStatus::Deleted(1)),
            None => Ok(DeleteStatus::Missing),
        }
    }

    fn name(&self) -> &str {
        self.name
    }
}
