//! Request and response body used across transports.
//!
//! A [`Body`] is either fully buffered in memory or a boxed stream handed
//! over by the underlying HTTP client. Caching layers buffer responses with
//! [`Body::collect`] before dumping them, and hand buffered bodies back to
//! the caller so the response can still be read after it was stored.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Body as HttpBody, Frame, SizeHint};
use http_body_util::BodyExt;
use http_body_util::combinators::BoxBody;
use pin_project::pin_project;

use crate::BoxError;

/// HTTP body flowing through a transport chain.
#[pin_project(project = BodyProj)]
pub enum Body {
    /// Body held completely in memory.
    ///
    /// The `Option` lets the bytes be yielded once, after which the body ends.
    Full(Option<Bytes>),
    /// Body streamed from an underlying transport.
    Streaming(#[pin] BoxBody<Bytes, BoxError>),
}

impl Body {
    /// Creates an empty body.
    pub fn empty() -> Self {
        Body::Full(None)
    }

    /// Wraps any [`http_body::Body`] as a streaming body.
    pub fn wrap<B>(body: B) -> Self
    where
        B: HttpBody<Data = Bytes> + Send + Sync + 'static,
        B::Error: Into<BoxError>,
    {
        Body::Streaming(body.map_err(Into::into).boxed())
    }

    /// Returns the buffered bytes without polling, if the body is held in memory.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Full(Some(bytes)) => Some(bytes.as_ref()),
            Body::Full(None) => Some(&[]),
            Body::Streaming(_) => None,
        }
    }

    /// Reads the whole body into memory.
    ///
    /// Trailers are discarded.
    pub async fn collect(self) -> Result<Bytes, BoxError> {
        match self {
            Body::Full(bytes) => Ok(bytes.unwrap_or_default()),
            Body::Streaming(stream) => Ok(BodyExt::collect(stream).await?.to_bytes()),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Full(bytes) => f
                .debug_tuple("Full")
                .field(&bytes.as_ref().map(Bytes::len).unwrap_or_default())
                .finish(),
            Body::Streaming(_) => f.debug_tuple("Streaming").finish(),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            Body::empty()
        } else {
            Body::Full(Some(bytes))
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::from(Bytes::from(bytes))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::from(Bytes::from(text))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Body::from(Bytes::from_static(text.as_bytes()))
    }
}

impl From<&'static [u8]> for Body {
    fn from(bytes: &'static [u8]) -> Self {
        Body::from(Bytes::from_static(bytes))
    }
}

impl HttpBody for Body {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            BodyProj::Full(data) => Poll::Ready(data.take().map(|bytes| Ok(Frame::data(bytes)))),
            BodyProj::Streaming(body) => body.poll_frame(cx),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            Body::Full(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            Body::Full(None) => SizeHint::with_exact(0),
            Body::Streaming(body) => body.size_hint(),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Body::Full(data) => data.is_none(),
            Body::Streaming(body) => body.is_end_stream(),
        }
    }
}
