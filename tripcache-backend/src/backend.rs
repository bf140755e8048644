use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{BackendError, DeleteStatus};

/// Result of a backend operation.
pub type BackendResult<T> = Result<T, BackendError>;

/// Byte store consulted by the caching transport.
///
/// Keys are opaque strings and values are opaque byte blobs. The store owns
/// expiration and eviction; callers only pass the TTL an entry should live
/// for. Implementations handle their own internal synchronisation and must
/// tolerate uncoordinated concurrent calls for the same key (last write wins).
#[async_trait]
pub trait Backend: Sync + Send {
    /// Reads the value stored under `key`.
    ///
    /// A missing or expired entry is `Ok(None)`.
    async fn get(&self, key: &str) -> BackendResult<Option<Bytes>>;

    /// Stores `value` under `key` for `ttl`.
    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()>;

    /// Removes the value stored under `key`.
    async fn delete(&self, key: &str) -> BackendResult<DeleteStatus>;

    /// Returns the name of this backend, used in logs.
    fn name(&self) -> &str {
        "backend"
    }
}

#[async_trait]
impl Backend for &dyn Backend {
    async fn get(&self, key: &str) -> BackendResult<Option<Bytes>> {
        (*self).get(key).await
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        (*self).set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> BackendResult<DeleteStatus> {
        (*self).delete(key).await
    }

    fn name(&self) -> &str {
        (*self).name()
    }
}

#[async_trait]
impl Backend for Box<dyn Backend> {
    async fn get(&self, key: &str) -> BackendResult<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        (**self).set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> BackendResult<DeleteStatus> {
        (**self).delete(key).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<B> Backend for Arc<B>
where
    B: Backend + ?Sized,
{
    async fn get(&self, key: &str) -> BackendResult<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        (**self).set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> BackendResult<DeleteStatus> {
        (**self).delete(key).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
