use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::negotiate;
use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Per-exchange encoding decisions made by the connection handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoding {
    /// Client negotiated `Accept-Encoding: gzip`.
    pub gzip: bool,
    /// Connection closes after this response.
    pub close: bool,
}

fn push_header(buf: &mut Vec<u8>, name: &str, value: &str) {
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(b": ");
    buf.extend_from_slice(value.as_bytes());
    buf.extend_from_slice(b"\r\n");
}

/// Serializes the status line and headers for `body`.
///
/// Header order is fixed: `Content-Type`, `Connection`, the response's own
/// headers in insertion order, `Content-Encoding`, then `Content-Length`.
fn serialize_head(resp: &Response, body: &[u8], compressed: bool, close: bool) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);

    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    if let Some(content_type) = &resp.content_type {
        push_header(&mut buf, "Content-Type", content_type);
    }
    if close {
        push_header(&mut buf, "Connection", "close");
    }
    for (k, v) in resp.headers.iter() {
        if k.eq_ignore_ascii_case("Content-Length") {
            continue;
        }
        push_header(&mut buf, k, v);
    }
    if compressed {
        push_header(&mut buf, "Content-Encoding", "gzip");
    }
    push_header(&mut buf, "Content-Length", &body.len().to_string());

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// A response encoded for the wire, split into head and body so they go out
/// as separate writes.
#[derive(Debug)]
pub struct ResponseWriter {
    head: Vec<u8>,
    body: Vec<u8>,
}

impl ResponseWriter {
    /// Encodes `response`, compressing the body first when gzip was
    /// negotiated and there is something to compress.
    pub fn new(mut response: Response, encoding: Encoding) -> io::Result<Self> {
        let compress = encoding.gzip && !response.body.is_empty();
        let body = if compress {
            negotiate::gzip(&response.body)?
        } else {
            std::mem::take(&mut response.body)
        };

        Ok(Self {
            head: serialize_head(&response, &body, compress, encoding.close),
            body,
        })
    }

    pub fn head(&self) -> &[u8] {
        &self.head
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Head and body concatenated, as the peer would see them.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.head.len() + self.body.len());
        out.extend_from_slice(&self.head);
        out.extend_from_slice(&self.body);
        out
    }

    pub async fn write_to_stream<W>(&self, stream: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(&self.head).await?;
        if !self.body.is_empty() {
            stream.write_all(&self.body).await?;
        }
        stream.flush().await
    }
}
