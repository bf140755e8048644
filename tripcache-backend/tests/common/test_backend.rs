//! Simple in-memory test backends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tripcache_backend::{Backend, BackendError, BackendResult, DeleteStatus};

/// In-memory backend that remembers the TTL of every write.
#[derive(Clone, Default)]
pub struct TestBackend {
    store: Arc<DashMap<String, (Bytes, Duration)>>,
}

impl TestBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.store.get(key).map(|entry| entry.1)
    }
}

#[async_trait]
impl Backend for TestBackend {
    async fn get(&self, key: &str) -> BackendResult<Option<Bytes>> {
        Ok(self.store.get(key).map(|entry| entry.0.clone()))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        self.store.insert(key.to_owned(), (value, ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> BackendResult<DeleteStatus> {
        Ok(match self.store.remove(key) {
            Some(_) => DeleteStatus::Deleted(1),
            None => DeleteStatus::Missing,
        })
    }

    fn name(&self) -> &str {
        "test"
    }
}

/// Backend that always returns errors.
#[derive(Clone, Default)]
pub struct ErrorBackend;

fn simulated() -> BackendError {
    BackendError::InternalError(Box::new(std::io::Error::other("simulated error")))
}

#[async_trait]
impl Backend for ErrorBackend {
    async fn get(&self, _key: &str) -> BackendResult<Option<Bytes>> {
        Err(simulated())
    }

    async fn set(&self, _key: &str, _value: Bytes, _ttl: Duration) -> BackendResult<()> {
        Err(simulated())
    }

    async fn delete(&self, _key: &str) -> BackendResult<DeleteStatus> {
        Err(simulated())
    }

    fn name(&self) -> &str {
        "error"
    }
}
