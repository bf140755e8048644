#![allow(dead_code)]

pub mod test_backend;
pub mod test_transport;

pub use test_backend::{FailingBackend, PendingBackend, RecordingBackend};
pub use test_transport::CountingTransport;

use tripcache::{Body, Request};

pub fn get(uri: &str) -> Request {
    http::Request::get(uri).body(Body::empty()).unwrap()
}

pub fn request(method: http::Method, uri: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
