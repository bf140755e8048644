//! Base transport over reqwest.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::trace;
use tripcache_core::{Body, Error, Request, Response, RoundTripContext, Transport};

/// Sends requests with a [`reqwest::Client`].
///
/// The client is cheap to clone and pools connections, so one instance is
/// normally shared by every chain in a process. The request's
/// [`RoundTripContext`] bounds the whole exchange up to the response head;
/// the body streams afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps an existing client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Returns the wrapped client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl From<reqwest::Client> for ReqwestTransport {
    fn from(client: reqwest::Client) -> Self {
        Self::new(client)
    }
}

/// Converts a chain body into a reqwest body.
///
/// Buffered bodies are handed over as bytes; streaming bodies are wrapped.
pub fn into_reqwest_body(body: Body) -> reqwest::Body {
    match body {
        Body::Full(Some(bytes)) => reqwest::Body::from(bytes),
        Body::Full(None) => reqwest::Body::from(Bytes::new()),
        streaming @ Body::Streaming(_) => reqwest::Body::wrap(streaming),
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn round_trip(&self, request: Request) -> Result<Response, Error> {
        let context = RoundTripContext::of(&request);
        let (parts, body) = request.into_parts();
        trace!(method = %parts.method, uri = %parts.uri, "sending request");

        let request = reqwest::Request::try_from(http::Request::from_parts(
            parts,
            into_reqwest_body(body),
        ))
        .map_err(Error::transport)?;

        let response = context
            .run(self.client.execute(request))
            .await?
            .map_err(Error::transport)?;

        let response: http::Response<reqwest::Body> = response.into();
        let (parts, body) = response.into_parts();
        trace!(status = %parts.status, "received response head");
        Ok(Response::from_parts(parts, Body::wrap(body)))
    }
}
