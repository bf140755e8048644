//! Storage doubles recording every call.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tripcache_backend::{Backend, BackendError, BackendResult, DeleteStatus};

/// In-memory backend counting reads and writes.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    store: Arc<DashMap<String, (Bytes, Duration)>>,
    gets: Arc<AtomicUsize>,
    sets: Arc<AtomicUsize>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn payload(&self, key: &str) -> Option<Bytes> {
        self.store.get(key).map(|entry| entry.0.clone())
    }

    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.store.get(key).map(|entry| entry.1)
    }

    pub fn insert(&self, key: &str, payload: impl Into<Bytes>) {
        self.store
            .insert(key.to_owned(), (payload.into(), Duration::from_secs(60)));
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    async fn get(&self, key: &str) -> BackendResult<Option<Bytes>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.store.get(key).map(|entry| entry.0.clone()))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
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
        "recording"
    }
}

fn simulated() -> BackendError {
    BackendError::ConnectionError(Box::new(std::io::Error::other("simulated outage")))
}

/// Backend failing reads, writes, or both.
#[derive(Clone, Default)]
pub struct FailingBackend {
    pub fail_get: bool,
    pub fail_set: bool,
    pub inner: RecordingBackend,
}

impl FailingBackend {
    pub fn on_get() -> Self {
        Self {
            fail_get: true,
            ..Self::default()
        }
    }

    pub fn on_set() -> Self {
        Self {
            fail_set: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Backend for FailingBackend {
    async fn get(&self, key: &str) -> BackendResult<Option<Bytes>> {
        if self.fail_get {
            return Err(simulated());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        if self.fail_set {
            return Err(simulated());
        }
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, _key: &str) -> BackendResult<DeleteStatus> {
        Err(simulated())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Backend whose reads never complete.
#[derive(Clone, Default)]
pub struct PendingBackend;

#[async_trait]
impl Backend for PendingBackend {
    async fn get(&self, _key: &str) -> BackendResult<Option<Bytes>> {
        std::future::pending().await
    }

    async fn set(&self, _key: &str, _value: Bytes, _ttl: Duration) -> BackendResult<()> {
        std::future::pending().await
    }

    async fn delete(&self, _key: &str) -> BackendResult<DeleteStatus> {
        std::future::pending().await
    }
}
