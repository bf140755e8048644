//! The transport contract.
//!
//! A [`Transport`] performs one round trip: it takes a request and yields a
//! response or an [`Error`]. Network clients implement it at the bottom of a
//! chain; decorators (caching, header injection, tracing) implement it by
//! delegating to the transport they wrap.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{Error, Request, Response};

/// One request-to-response cycle.
///
/// Implementations must be safe to call concurrently from many tasks.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use tripcache_core::{Body, Error, Request, Response, Transport};
///
/// struct Teapot;
///
/// #[async_trait]
/// impl Transport for Teapot {
///     async fn round_trip(&self, _request: Request) -> Result<Response, Error> {
///         let mut response = Response::new(Body::from("short and stout"));
///         *response.status_mut() = http::StatusCode::IM_A_TEAPOT;
///         Ok(response)
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response.
    async fn round_trip(&self, request: Request) -> Result<Response, Error>;
}

/// Shared, type-erased transport.
///
/// This is what chain layers receive and return.
pub type BoxTransport = Arc<dyn Transport>;

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn round_trip(&self, request: Request) -> Result<Response, Error> {
        (**self).round_trip(request).await
    }
}

#[async_trait]
impl<T> Transport for Box<T>
where
    T: Transport + ?Sized,
{
    async fn round_trip(&self, request: Request) -> Result<Response, Error> {
        (**self).round_trip(request).await
    }
}

#[async_trait]
impl<T> Transport for &T
where
    T: Transport + ?Sized,
{
    async fn round_trip(&self, request: Request) -> Result<Response, Error> {
        (**self).round_trip(request).await
    }
}

/// Transport backed by an async closure. Created with [`transport_fn`].
#[derive(Clone)]
pub struct TransportFn<F> {
    f: F,
}

impl<F> fmt::Debug for TransportFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportFn")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}

/// Turns an async closure into a [`Transport`].
///
/// ```
/// use tripcache_core::{Body, Response, Transport, transport_fn};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let echo = transport_fn(|request: tripcache_core::Request| async move {
///     Ok(Response::new(request.into_body()))
/// });
/// let response = echo
///     .round_trip(http::Request::new(Body::from("ping")))
///     .await
///     .unwrap();
/// assert_eq!(response.into_body().collect().await.unwrap(), "ping");
/// # }
/// ```
pub fn transport_fn<F, Fut>(f: F) -> TransportFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, Error>> + Send,
{
    TransportFn { f }
}

#[async_trait]
impl<F, Fut> Transport for TransportFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, Error>> + Send,
{
    async fn round_trip(&self, request: Request) -> Result<Response, Error> {
        (self.f)(request).await
    }
}
