//! Inner transport double counting round trips.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use tripcache::{Body, Error, Request, Response, Transport};

/// Answers every request with the same response and counts calls.
#[derive(Clone)]
pub struct CountingTransport {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl CountingTransport {
    pub fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body.as_bytes()),
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn hello() -> Self {
        Self::new(StatusCode::OK, "hello world")
            .header("content-type", "text/plain")
            .header("content-length", "11")
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::hello()
        }
    }

    pub fn header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.append(name, value.parse().unwrap());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for CountingTransport {
    async fn round_trip(&self, request: Request) -> Result<Response, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::transport(std::io::Error::other("connection refused")));
        }
        let body = if request.method() == http::Method::HEAD {
            Body::empty()
        } else {
            Body::from(self.body.clone())
        };
        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        Ok(response)
    }
}
