#![warn(missing_docs)]
//! # tripcache-core
//!
//! The transport contract shared by every tripcache crate.
//!
//! A client-side HTTP cache in tripcache is a decorator: it wraps a
//! [`Transport`], answers requests from storage when it can, and otherwise
//! forwards them to the transport it wraps. This crate holds the pieces
//! every decorator and every network client agree on:
//!
//! - [`Transport`] — one async round trip, request in, response out
//! - [`Body`] — buffered or streaming body carried by [`Request`] and [`Response`]
//! - [`Error`] — transport, cache, cancellation and deadline failures
//! - [`RoundTripContext`] — caller-supplied cancellation token and deadline

pub mod body;
pub mod context;
pub mod error;
pub mod transport;

pub use body::Body;
pub use context::RoundTripContext;
pub use error::Error;
pub use transport::{BoxTransport, Transport, TransportFn, transport_fn};

/// Boxed error used at crate seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Request flowing through a transport chain.
pub type Request = http::Request<Body>;

/// Response flowing back through a transport chain.
pub type Response = http::Response<Body>;
