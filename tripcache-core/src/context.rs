//! Per-round-trip cancellation and deadline.
//!
//! A [`RoundTripContext`] travels with a request in its extensions. Layers
//! that perform their own I/O (storage lookups, the inner transport call)
//! run it through [`RoundTripContext::run`] so that cancellation and
//! deadlines unwind the round trip promptly with an [`Error`] instead of
//! blocking. Requests without a context are never cancelled by the chain.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{Error, Request};

/// Cancellation token and optional deadline for one round trip.
#[derive(Debug, Clone, Default)]
pub struct RoundTripContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RoundTripContext {
    /// Creates a context that is cancelled only through [`cancel`](Self::cancel).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context bound to an existing token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Sets an absolute deadline.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline relative to now.
    pub fn timeout(self, timeout: Duration) -> Self {
        self.deadline(Instant::now() + timeout)
    }

    /// Cancels every round trip sharing this context.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns the underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Attaches this context to a request, replacing any previous one.
    pub fn attach(self, request: &mut Request) {
        request.extensions_mut().insert(self);
    }

    /// Returns the context attached to `request`, or a context that never fires.
    pub fn of(request: &Request) -> RoundTripContext {
        request
            .extensions()
            .get::<RoundTripContext>()
            .cloned()
            .unwrap_or_default()
    }

    /// Checks the context without waiting.
    pub fn check(&self) -> Result<(), Error> {
        if self.token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Error::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drives `future` to completion unless the context fires first.
    ///
    /// When the context fires, `future` is dropped and the matching error is
    /// returned.
    pub async fn run<F, T>(&self, future: F) -> Result<T, Error>
    where
        F: Future<Output = T>,
    {
        self.check()?;
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Error::Cancelled),
            _ = deadline => Err(Error::DeadlineExceeded),
            output = future => Ok(output),
        }
    }
}
