//! Two-tier backend: a fast local store in front of a shared remote store.
//!
//! # Read Strategy
//! 1. Check L1 → Hit: return value
//! 2. Check L2 → Hit: populate L1, return value
//! 3. Miss: return None
//!
//! # Write Strategy
//! Writes go to both layers, L1 first. The L1 copy of a write lives for the
//! smaller of the requested TTL and the configured L1 TTL.
//!
//! # Staleness
//! L2 does not report how long an entry has left, so an L1 refill always
//! lives for the full L1 TTL. A refilled copy may outlive the L2 entry it was
//! read from by up to that long; `l1_ttl` is the staleness bound.
//!
//! # Failures
//! A failing layer is logged and the other layer is still used. An operation
//! fails only when both layers fail.
//!
//! # Example
//! ```ignore
//! use std::time::Duration;
//! use tripcache_backend::Compose;
//! use tripcache_moka::MokaBackend;
//! use tripcache_redis::RedisBackend;
//!
//! let moka = MokaBackend::builder().max_entries(1_000).build();
//! let redis = RedisBackend::new()?;
//! let backend = moka.compose(redis, Duration::from_secs(60));
//! ```

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{trace, warn};

use crate::{Backend, BackendError, BackendResult, DeleteStatus};

/// Error type for composition backend operations.
#[derive(Debug, Error)]
pub enum CompositionError {
    /// Both L1 and L2 cache layers failed.
    #[error("Both cache layers failed - L1: {l1}, L2: {l2}")]
    BothLayersFailed {
        /// Error from L1 layer
        l1: BackendError,
        /// Error from L2 layer
        l2: BackendError,
    },
}

impl From<CompositionError> for BackendError {
    fn from(error: CompositionError) -> Self {
        BackendError::InternalError(Box::new(error))
    }
}

/// A backend that composes two backends into a layered store.
#[derive(Debug, Clone)]
pub struct CompositionBackend<L1, L2> {
    l1: L1,
    l2: L2,
    l1_ttl: Duration,
}

impl<L1, L2> CompositionBackend<L1, L2>
where
    L1: Backend,
    L2: Backend,
{
    /// Creates a composition.
    ///
    /// Entries written into L1 live at most `l1_ttl`; entries refilled from
    /// L2 live exactly `l1_ttl`.
    pub fn new(l1: L1, l2: L2, l1_ttl: Duration) -> Self {
        Self { l1, l2, l1_ttl }
    }

    /// Returns the first layer.
    pub fn l1(&self) -> &L1 {
        &self.l1
    }

    /// Returns the second layer.
    pub fn l2(&self) -> &L2 {
        &self.l2
    }
}

#[async_trait]
impl<L1, L2> Backend for CompositionBackend<L1, L2>
where
    L1: Backend,
    L2: Backend,
{
    async fn get(&self, key: &str) -> BackendResult<Option<Bytes>> {
        let l1_error = match self.l1.get(key).await {
            Ok(Some(value)) => {
                trace!(key, backend = self.l1.name(), "composition hit in L1");
                return Ok(Some(value));
            }
            Ok(None) => None,
            Err(error) => {
                warn!(key, backend = self.l1.name(), %error, "L1 read failed");
                Some(error)
            }
        };

        match self.l2.get(key).await {
            Ok(Some(value)) => {
                trace!(key, backend = self.l2.name(), "composition hit in L2, refilling L1");
                if let Err(error) = self.l1.set(key, value.clone(), self.l1_ttl).await {
                    warn!(key, backend = self.l1.name(), %error, "L1 refill failed");
                }
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(l2) => match l1_error {
                Some(l1) => Err(CompositionError::BothLayersFailed { l1, l2 }.into()),
                None => {
                    warn!(key, backend = self.l2.name(), error = %l2, "L2 read failed");
                    Err(l2)
                }
            },
        }
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> BackendResult<()> {
        let l1_result = self.l1.set(key, value.clone(), ttl.min(self.l1_ttl)).await;
        let l2_result = self.l2.set(key, value, ttl).await;
        match (l1_result, l2_result) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(l1), Err(l2)) => Err(CompositionError::BothLayersFailed { l1, l2 }.into()),
            (Err(error), Ok(())) => {
                warn!(key, backend = self.l1.name(), %error, "L1 write failed");
                Ok(())
            }
            (Ok(()), Err(error)) => {
                warn!(key, backend = self.l2.name(), %error, "L2 write failed");
                Ok(())
            }
        }
    }

    async fn delete(&self, key: &str) -> BackendResult<DeleteStatus> {
        let (l1_result, l2_result) =
            futures::join!(self.l1.delete(key), self.l2.delete(key));
        match (l1_result, l2_result) {
            (Err(l1), Err(l2)) => Err(CompositionError::BothLayersFailed { l1, l2 }.into()),
            (Ok(l1), Ok(l2)) => Ok(merge_delete_status(l1, l2)),
            (Ok(status), Err(error)) | (Err(error), Ok(status)) => {
                warn!(key, %error, "delete failed in one layer");
                Ok(status)
            }
        }
    }

    fn name(&self) -> &str {
        "composition"
    }
}

fn merge_delete_status(l1: DeleteStatus, l2: DeleteStatus) -> DeleteStatus {
    match (l1, l2) {
        (DeleteStatus::Deleted(a), DeleteStatus::Deleted(b)) => {
            DeleteStatus::Deleted(a.saturating_add(b))
        }
        (DeleteStatus::Deleted(n), DeleteStatus::Missing)
        | (DeleteStatus::Missing, DeleteStatus::Deleted(n)) => DeleteStatus::Deleted(n),
        (DeleteStatus::Missing, DeleteStatus::Missing) => DeleteStatus::Missing,
    }
}

/// Fluent construction of a [`CompositionBackend`].
pub trait Compose: Backend + Sized {
    /// Puts `self` in front of `l2`.
    fn compose<L2>(self, l2: L2, l1_ttl: Duration) -> CompositionBackend<Self, L2>
    where
        L2: Backend,
    {
        CompositionBackend::new(self, l2, l1_ttl)
    }
}

impl<B> Compose for B where B: Backend {}
