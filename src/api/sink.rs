//! Transport seam for response output.
//!
//! The writer only talks to a [`ResponseSink`]. Two sinks ship with the crate:
//! [`BufferedResponse`], which becomes an axum [`Response`], and
//! [`StreamSink`], which renders HTTP/1.1 onto any byte stream.

use std::io::{self, Write};

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

/// Destination of one response. A sink is owned by a single request and is
/// written by one writer at a time.
pub trait ResponseSink {
    fn set_status(&mut self, status: StatusCode) -> io::Result<()>;

    /// Set a header, replacing any previous value with the same name
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> io::Result<()>;

    fn write_body(&mut self, body: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

impl<S: ResponseSink + ?Sized> ResponseSink for &mut S {
    fn set_status(&mut self, status: StatusCode) -> io::Result<()> {
        (**self).set_status(status)
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> io::Result<()> {
        (**self).set_header(name, value)
    }

    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        (**self).write_body(body)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// In-memory sink that turns into an axum response
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Split into status, headers and the frozen body
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        (self.status, self.headers, self.body.freeze())
    }
}

impl ResponseSink for BufferedResponse {
    fn set_status(&mut self, status: StatusCode) -> io::Result<()> {
        self.status = status;
        Ok(())
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> io::Result<()> {
        self.headers.insert(name, value);
        Ok(())
    }

    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(body);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl IntoResponse for BufferedResponse {
    fn into_response(self) -> Response {
        let (status, headers, body) = self.into_parts();
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

/// Sink that renders an HTTP/1.1 response onto a byte stream.
///
/// Status and headers are buffered until the first body write or flush, which
/// commits the head; changing either afterwards fails.
#[derive(Debug)]
pub struct StreamSink<W> {
    inner: W,
    status: StatusCode,
    headers: HeaderMap,
    committed: bool,
}

impl<W: Write> StreamSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, status: StatusCode::OK, headers: HeaderMap::new(), committed: false }
    }

    /// Whether the status line and headers were already written
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.committed {
            return Err(io::Error::new(io::ErrorKind::Other, "response head already committed"));
        }
        Ok(())
    }

    fn commit(&mut self) -> io::Result<()> {
        if self.committed {
            return Ok(());
        }

        let mut head = Vec::with_capacity(256);
        write!(
            head,
            "HTTP/1.1 {} {}\r\n",
            self.status.as_str(),
            self.status.canonical_reason().unwrap_or("")
        )?;
        for (name, value) in &self.headers {
            head.extend_from_slice(name.as_str().as_bytes());
            head.extend_from_slice(b": ");
            head.extend_from_slice(value.as_bytes());
            head.extend_from_slice(b"\r\n");
        }
        head.extend_from_slice(b"\r\n");

        self.inner.write_all(&head)?;
        self.committed = true;
        Ok(())
    }
}

impl<W: Write> ResponseSink for StreamSink<W> {
    fn set_status(&mut self, status: StatusCode) -> io::Result<()> {
        self.ensure_open()?;
        self.status = status;
        Ok(())
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> io::Result<()> {
        self.ensure_open()?;
        self.headers.insert(name, value);
        Ok(())
    }

    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        self.commit()?;
        self.inner.write_all(body)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.commit()?;
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;

    #[test]
    fn test_buffered_response_into_response() {
        let mut sink = BufferedResponse::new();
        sink.set_status(StatusCode::ACCEPTED).unwrap();
        sink.set_header(CONTENT_TYPE, HeaderValue::from_static("text/plain")).unwrap();
        sink.write_body(b"queued").unwrap();
        sink.flush().unwrap();

        let response = sink.into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_buffered_header_replaces_previous_value() {
        let mut sink = BufferedResponse::new();
        sink.set_header(CONTENT_TYPE, HeaderValue::from_static("text/plain")).unwrap();
        sink.set_header(CONTENT_TYPE, HeaderValue::from_static("application/json")).unwrap();
        assert_eq!(sink.headers().get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(sink.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_stream_sink_renders_http1() {
        let mut sink = StreamSink::new(Vec::new());
        sink.set_status(StatusCode::NOT_FOUND).unwrap();
        sink.set_header(CONTENT_TYPE, HeaderValue::from_static("text/plain")).unwrap();
        sink.write_body(b"gone").unwrap();
        sink.flush().unwrap();

        let raw = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(raw, "HTTP/1.1 404 Not Found\r\ncontent-type: text/plain\r\n\r\ngone");
    }

    #[test]
    fn test_stream_sink_rejects_late_headers() {
        let mut sink = StreamSink::new(Vec::new());
        sink.write_body(b"partial").unwrap();
        assert!(sink.is_committed());

        assert!(sink.set_status(StatusCode::INTERNAL_SERVER_ERROR).is_err());
        assert!(sink.set_header(CONTENT_TYPE, HeaderValue::from_static("text/plain")).is_err());
    }

    #[test]
    fn test_sink_through_mutable_reference() {
        fn write_into(mut sink: impl ResponseSink) {
            sink.write_body(b"x").unwrap();
        }

        let mut sink = BufferedResponse::new();
        write_into(&mut sink);
        assert_eq!(sink.body(), b"x");
    }
}
