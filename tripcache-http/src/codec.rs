//! Byte-exact response dumps.
//!
//! A dump is the HTTP/1.x wire form of a response: status line, every header
//! line in map order, a blank line and the body. Responses sent with
//! `Transfer-Encoding: chunked` keep that header and get their (already
//! decoded) body re-framed as chunks so the dump stays self-describing.
//!
//! Hydrating a dump needs the request it answers, because whether a body
//! follows the head depends on the request method (a `HEAD` response never
//! carries one) as well as on the status code.
//!
//! Leading and trailing whitespace is not part of an HTTP/1.x field value,
//! so a header value stored with surrounding spaces is replayed without them.

use bytes::{BufMut, Bytes, BytesMut};
use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use http::response::Parts;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Version};
use thiserror::Error;
use tripcache_core::{Body, BoxError, Request, Response};

const INITIAL_HEADERS: usize = 64;
const MAX_HEADERS: usize = 1024;

/// Errors produced while dumping or hydrating a response.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The head of the dump is not valid HTTP.
    #[error("malformed response head: {0}")]
    Parse(#[from] httparse::Error),

    /// The dump ends before the head is complete.
    #[error("response head is incomplete")]
    Incomplete,

    /// The status code is outside the valid range.
    #[error("invalid status code {0}")]
    InvalidStatus(u16),

    /// A header name or value could not be represented.
    #[error("invalid header {0:?}")]
    InvalidHeader(String),

    /// The `Content-Length` header is not a number.
    #[error("invalid content-length header")]
    InvalidContentLength,

    /// The body is shorter than its framing announces.
    #[error("body truncated: expected {expected} bytes, found {actual}")]
    Truncated {
        /// Bytes announced by the framing.
        expected: usize,
        /// Bytes present in the dump.
        actual: usize,
    },

    /// A chunk of a chunked body is malformed.
    #[error("invalid chunked body")]
    InvalidChunk,

    /// Reading the response body failed.
    #[error("failed to read response body: {0}")]
    Body(#[source] BoxError),
}

/// Reads the whole body of `response` and dumps it.
///
/// Returns the response rebuilt over the buffered body together with the dump,
/// so the caller can still hand the response on.
pub async fn dump(response: Response) -> Result<(Response, Bytes), CodecError> {
    let (parts, body) = response.into_parts();
    let body = body.collect().await.map_err(CodecError::Body)?;
    let dumped = encode(&parts, &body);
    Ok((Response::from_parts(parts, Body::from(body)), dumped))
}

/// Writes the wire form of a response head and its fully read body.
pub fn encode(parts: &Parts, body: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(256 + body.len());

    buf.put_slice(version_str(parts.version).as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(parts.status.as_str().as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(parts.status.canonical_reason().unwrap_or_default().as_bytes());
    buf.put_slice(b"\r\n");

    for (name, value) in parts.headers.iter() {
        buf.put_slice(name.as_str().as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(value.as_bytes());
        buf.put_slice(b"\r\n");
    }
    buf.put_slice(b"\r\n");

    if is_chunked(&parts.headers) {
        if !body.is_empty() {
            buf.put_slice(format!("{:x}\r\n", body.len()).as_bytes());
            buf.put_slice(body);
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(b"0\r\n\r\n");
    } else {
        buf.put_slice(body);
    }

    buf.freeze()
}

/// Rebuilds the response stored in `data` for `request`.
pub fn hydrate(request: &Request, data: &[u8]) -> Result<Response, CodecError> {
    let head = parse_head(data)?;
    let rest = &data[head.offset..];

    let body = if !body_expected(request.method(), head.status) {
        Bytes::new()
    } else if is_chunked(&head.headers) {
        decode_chunked(rest)?
    } else if let Some(expected) = content_length(&head.headers)? {
        if rest.len() < expected {
            return Err(CodecError::Truncated {
                expected,
                actual: rest.len(),
            });
        }
        Bytes::copy_from_slice(&rest[..expected])
    } else {
        Bytes::copy_from_slice(rest)
    };

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = head.status;
    *response.version_mut() = head.version;
    *response.headers_mut() = head.headers;
    Ok(response)
}

struct Head {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    offset: usize,
}

fn parse_head(data: &[u8]) -> Result<Head, CodecError> {
    let mut capacity = INITIAL_HEADERS;
    loop {
        let mut slots = vec![httparse::EMPTY_HEADER; capacity];
        let mut raw = httparse::Response::new(&mut slots);
        let offset = match raw.parse(data) {
            Ok(httparse::Status::Complete(offset)) => offset,
            Ok(httparse::Status::Partial) => return Err(CodecError::Incomplete),
            Err(httparse::Error::TooManyHeaders) if capacity < MAX_HEADERS => {
                capacity *= 2;
                continue;
            }
            Err(error) => return Err(error.into()),
        };

        let code = raw.code.ok_or(CodecError::Incomplete)?;
        let status = StatusCode::from_u16(code).map_err(|_| CodecError::InvalidStatus(code))?;
        let version = match raw.version {
            Some(0) => Version::HTTP_10,
            _ => Version::HTTP_11,
        };

        let mut headers = HeaderMap::with_capacity(raw.headers.len());
        for header in raw.headers.iter() {
            let name = HeaderName::from_bytes(header.name.as_bytes())
                .map_err(|_| CodecError::InvalidHeader(header.name.to_owned()))?;
            let value = HeaderValue::from_bytes(header.value.trim_ascii())
                .map_err(|_| CodecError::InvalidHeader(header.name.to_owned()))?;
            headers.append(name, value);
        }

        return Ok(Head {
            status,
            version,
            headers,
            offset,
        });
    }
}

fn decode_chunked(data: &[u8]) -> Result<Bytes, CodecError> {
    let mut body = BytesMut::with_capacity(data.len());
    let mut pos = 0;
    loop {
        let (consumed, size) = match httparse::parse_chunk_size(&data[pos..]) {
            Ok(httparse::Status::Complete(chunk)) => chunk,
            Ok(httparse::Status::Partial) => {
                return Err(CodecError::Truncated {
                    expected: pos + 1,
                    actual: data.len(),
                });
            }
            Err(_) => return Err(CodecError::InvalidChunk),
        };
        pos += consumed;
        if size == 0 {
            // trailers are not replayed
            return Ok(body.freeze());
        }

        let size = usize::try_from(size).map_err(|_| CodecError::InvalidChunk)?;
        let end = pos.checked_add(size).ok_or(CodecError::InvalidChunk)?;
        if data.len() < end + 2 {
            return Err(CodecError::Truncated {
                expected: end + 2,
                actual: data.len(),
            });
        }
        body.put_slice(&data[pos..end]);
        if &data[end..end + 2] != b"\r\n" {
            return Err(CodecError::InvalidChunk);
        }
        pos = end + 2;
    }
}

fn body_expected(method: &Method, status: StatusCode) -> bool {
    *method != Method::HEAD
        && !status.is_informational()
        && status != StatusCode::NO_CONTENT
        && status != StatusCode::NOT_MODIFIED
}

fn is_chunked(headers: &HeaderMap) -> bool {
    headers
        .get_all(TRANSFER_ENCODING)
        .iter()
        .next_back()
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.rsplit(',').next())
        .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
}

fn content_length(headers: &HeaderMap) -> Result<Option<usize>, CodecError> {
    headers
        .get(CONTENT_LENGTH)
        .map(|value| {
            value
                .to_str()
                .ok()
                .and_then(|value| value.trim().parse::<usize>().ok())
                .ok_or(CodecError::InvalidContentLength)
        })
        .transpose()
}

fn version_str(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "HTTP/1.0"
    } else {
        "HTTP/1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn get() -> Request {
        http::Request::get("http://example.com/")
            .body(Body::empty())
            .unwrap()
    }

    fn head() -> Request {
        http::Request::head("http://example.com/")
            .body(Body::empty())
            .unwrap()
    }

    fn response(status: u16, headers: &[(&str, &str)], body: &'static str) -> Response {
        let mut builder = http::Response::builder().status(status);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[test]
    fn encode_writes_wire_format() {
        let (parts, _) = response(200, &[("content-length", "11")], "").into_parts();
        let dumped = encode(&parts, b"hello world");
        assert_eq!(
            std::str::from_utf8(&dumped).unwrap(),
            "HTTP/1.1 200 OK\r\ncontent-length: 11\r\n\r\nhello world"
        );
    }

    #[test]
    fn padded_header_values_are_replayed_trimmed() {
        let (parts, _) = response(200, &[("x-pad", " padded "), ("content-length", "2")], "")
            .into_parts();
        let dumped = encode(&parts, b"ok");
        let restored = hydrate(&get(), &dumped).unwrap();
        assert_eq!(restored.headers()["x-pad"], "padded");
        assert_eq!(restored.headers()["content-length"], "2");
    }

    #[test]
    fn encode_reframes_chunked_bodies() {
        let (parts, _) = response(200, &[("transfer-encoding", "chunked")], "").into_parts();
        let dumped = encode(&parts, b"hello world");
        assert!(dumped.ends_with(b"\r\n\r\nb\r\nhello world\r\n0\r\n\r\n"));
    }

    #[tokio::test]
    async fn dump_keeps_response_readable() {
        let original = response(201, &[("x-custom", "1")], "created");
        let (replayed, dumped) = dump(original).await.unwrap();
        assert_eq!(replayed.status(), StatusCode::CREATED);
        assert_eq!(replayed.headers()["x-custom"], "1");
        assert_eq!(replayed.into_body().collect().await.unwrap(), "created");
        assert!(dumped.starts_with(b"HTTP/1.1 201 Created\r\n"));
    }

    #[tokio::test]
    async fn hydrate_restores_status_headers_and_body() {
        let original = response(
            404,
            &[
                ("content-type", "text/plain"),
                ("set-cookie", "a=1"),
                ("set-cookie", "b=2"),
            ],
            "not here",
        );
        let expected_headers = original.headers().clone();
        let (_, dumped) = dump(original).await.unwrap();

        let restored = hydrate(&get(), &dumped).unwrap();
        assert_eq!(restored.status(), StatusCode::NOT_FOUND);
        assert_eq!(restored.headers(), &expected_headers);
        assert_eq!(restored.into_body().collect().await.unwrap(), "not here");
    }

    #[tokio::test]
    async fn hydrate_decodes_chunked_body() {
        let original = response(200, &[("transfer-encoding", "chunked")], "hello world");
        let (_, dumped) = dump(original).await.unwrap();

        let restored = hydrate(&get(), &dumped).unwrap();
        assert_eq!(restored.headers()["transfer-encoding"], "chunked");
        assert_eq!(restored.into_body().collect().await.unwrap(), "hello world");
    }

    #[tokio::test]
    async fn hydrate_head_request_has_no_body() {
        let dumped = b"HTTP/1.1 200 OK\r\ncontent-length: 11\r\n\r\n";
        let restored = hydrate(&head(), dumped).unwrap();
        assert_eq!(restored.headers()["content-length"], "11");
        assert!(restored.into_body().collect().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn hydrate_honours_content_length() {
        let dumped = b"HTTP/1.1 200 OK\r\ncontent-length: 5\r\n\r\nhello world";
        let restored = hydrate(&get(), dumped).unwrap();
        assert_eq!(restored.into_body().collect().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn hydrate_reads_to_end_without_framing() {
        let dumped = b"HTTP/1.0 200 OK\r\n\r\nuntil close";
        let restored = hydrate(&get(), dumped).unwrap();
        assert_eq!(restored.version(), Version::HTTP_10);
        assert_eq!(restored.into_body().collect().await.unwrap(), "until close");
    }

    #[test]
    fn hydrate_rejects_truncated_body() {
        let dumped = b"HTTP/1.1 200 OK\r\ncontent-length: 50\r\n\r\nshort";
        assert!(matches!(
            hydrate(&get(), dumped),
            Err(CodecError::Truncated {
                expected: 50,
                actual: 5
            })
        ));
    }

    #[test]
    fn hydrate_rejects_garbage() {
        assert!(matches!(
            hydrate(&get(), b"not a response"),
            Err(CodecError::Parse(_))
        ));
        assert!(matches!(
            hydrate(&get(), b"HTTP/1.1 200 OK\r\nx-a: 1\r\n"),
            Err(CodecError::Incomplete)
        ));
        assert!(matches!(
            hydrate(&get(), b"HTTP/1.1 200 OK\r\ntransfer-encoding: chunked\r\n\r\nzz\r\n"),
            Err(CodecError::InvalidChunk)
        ));
    }

    #[tokio::test]
    async fn no_content_ignores_trailing_bytes() {
        let dumped = b"HTTP/1.1 204 No Content\r\n\r\nleftover";
        let restored = hydrate(&get(), dumped).unwrap();
        assert_eq!(restored.status(), StatusCode::NO_CONTENT);
        assert!(restored.into_body().collect().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn many_headers_are_supported() {
        let mut builder = http::Response::builder().status(200);
        for i in 0..200 {
            builder = builder.header(format!("x-h-{i}"), i.to_string());
        }
        let original = builder.body(Body::from("ok")).unwrap();
        let expected_headers = original.headers().clone();
        let (_, dumped) = dump(original).await.unwrap();

        let restored = hydrate(&get(), &dumped).unwrap();
        assert_eq!(restored.headers(), &expected_headers);
    }
}
