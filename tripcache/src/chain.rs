//! Ordered middleware composition around a base transport.
//!
//! Layers are registered outermost first. With layers `[a, b]` and base `t`
//! the effective transport is `a(b(t))`: a request passes `a`, then `b`,
//! then `t`, and the response flows back `t`, `b`, `a`.
//!
//! ```
//!
//! use tripcache::chain::Chain;
//! use tripcache_core::{Body, BoxTransport, Response, transport_fn};
//!
//! let base = transport_fn(|_request| async { Ok(Response::new(Body::from("hello"))) });
//! let mut chain = Chain::new(base);
//! chain.with(|next: BoxTransport| next);
//! assert_eq!(chain.len(), 1);
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tripcache_core::{BoxTransport, Error, Request, Response, Transport};

/// A decorator factory: takes the next transport, returns one wrapping it.
pub trait Layer: Send + Sync {
    /// Wraps `next`.
    fn layer(&self, next: BoxTransport) -> BoxTransport;
}

impl<F> Layer for F
where
    F: Fn(BoxTransport) -> BoxTransport + Send + Sync,
{
    fn layer(&self, next: BoxTransport) -> BoxTransport {
        self(next)
    }
}

/// A base transport wrapped by an ordered list of [`Layer`]s.
///
/// The composed transport is built on first use and reused until the layer
/// list changes.
pub struct Chain {
    base: BoxTransport,
    layers: Vec<Arc<dyn Layer>>,
    built: OnceLock<BoxTransport>,
}

impl Chain {
    /// Creates a chain with no layers around `base`.
    pub fn new(base: impl Transport + 'static) -> Self {
        Self {
            base: Arc::new(base),
            layers: Vec::new(),
            built: OnceLock::new(),
        }
    }

    /// Appends `layer` inside all previously registered layers.
    pub fn with(&mut self, layer: impl Layer + 'static) -> &mut Self {
        self.layers.push(Arc::new(layer));
        self.built = OnceLock::new();
        self
    }

    /// Builder-style [`with`](Self::with).
    #[must_use]
    pub fn layer(mut self, layer: impl Layer + 'static) -> Self {
        self.with(layer);
        self
    }

    /// Number of registered layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` when no layer is registered.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns the composed transport, building it if needed.
    pub fn transport(&self) -> BoxTransport {
        Arc::clone(self.built.get_or_init(|| self.build()))
    }

    fn build(&self) -> BoxTransport {
        self.layers
            .iter()
            .rev()
            .fold(Arc::clone(&self.base), |next, layer| layer.layer(next))
    }
}

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
impl Default for Chain {
    /// A chain over a default `reqwest::Client`.
    fn default() -> Self {
        Chain::new(tripcache_reqwest::ReqwestTransport::default())
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("layers", &self.layers.len())
            .field("built", &self.built.get().is_some())
            .finish()
    }
}

#[async_trait]
impl Transport for Chain {
    async fn round_trip(&self, request: Request) -> Result<Response, Error> {
        self.transport().round_trip(request).await
    }
}
