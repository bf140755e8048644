#![warn(missing_docs)]
//! # tripcache-reqwest
//!
//! [`ReqwestTransport`] performs the actual network round trip at the bottom
//! of a tripcache chain, using a shared [`reqwest::Client`].
//!
//! ```no_run
//! use tripcache_core::{Body, Transport};
//! use tripcache_reqwest::ReqwestTransport;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), tripcache_core::Error> {
//! let transport = ReqwestTransport::default();
//! let request = http::Request::get("http://example.com/")
//!     .body(Body::empty())
//!     .expect("valid request");
//! let response = transport.round_trip(request).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

mod transport;

pub use transport::{ReqwestTransport, into_reqwest_body};
