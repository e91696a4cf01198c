use bytes::BytesMut;
use thiserror::Error;

use crate::http::headers::Headers;
use crate::http::request::{Method, Request};

/// Upper bound on the request line plus header block.
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request line: {0:?}")]
    InvalidRequestLine(String),

    #[error("request head exceeds {MAX_HEAD_SIZE} bytes")]
    HeadTooLarge,

    /// Only produced by [`parse_http_request`]; the decoder reports this as
    /// `Ok(None)` instead.
    #[error("incomplete request")]
    Incomplete,
}

/// Request line and headers collected so far.
#[derive(Debug)]
struct Head {
    method: Method,
    path: String,
    version: String,
    headers: Headers,
}

impl Head {
    fn content_length(&self) -> usize {
        self.headers
            .get("Content-Length")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0)
    }

    fn into_request(self, body: Vec<u8>) -> Request {
        Request {
            method: self.method,
            path: self.path,
            version: self.version,
            headers: self.headers,
            body,
        }
    }
}

#[derive(Debug)]
enum State {
    RequestLine,
    Headers(Head),
    Body(Head, usize),
}

/// Incremental HTTP/1.1 request decoder.
///
/// Feed it the connection's read buffer; each call consumes as much as it
/// can and either yields a full request or asks for more bytes by returning
/// `Ok(None)`. Partial progress is kept across calls, so a request split over
/// many TCP segments is only scanned once.
///
/// ```text
/// RequestLine ──line──▶ Headers ──blank line──▶ Body(n) ──n bytes──▶ Request
///      ▲  └─ blank line (skipped)                                     │
///      └──────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug)]
pub struct RequestDecoder {
    state: State,
    head_bytes: usize,
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestDecoder {
    pub fn new() -> Self {
        Self {
            state: State::RequestLine,
            head_bytes: 0,
        }
    }

    /// True when no part of a request has been consumed yet.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::RequestLine) && self.head_bytes == 0
    }

    pub fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Request>, ParseError> {
        loop {
            match std::mem::replace(&mut self.state, State::RequestLine) {
                State::RequestLine => {
                    let Some(line) = self.take_line(buf)? else {
                        return Ok(None);
                    };
                    let line = line.trim();
                    if line.is_empty() {
                        // stray CRLF between requests
                        self.head_bytes = 0;
                        continue;
                    }
                    self.state = State::Headers(parse_request_line(line)?);
                }

                State::Headers(mut head) => {
                    let Some(line) = self.take_line(buf)? else {
                        self.state = State::Headers(head);
                        return Ok(None);
                    };
                    let line = line.trim();
                    if line.is_empty() {
                        let len = head.content_length();
                        self.state = State::Body(head, len);
                        continue;
                    }
                    // lines without ": " are ignored
                    if let Some((name, value)) = line.split_once(": ") {
                        head.headers.insert(name, value);
                    }
                    self.state = State::Headers(head);
                }

                State::Body(head, len) => {
                    if buf.len() < len {
                        self.state = State::Body(head, len);
                        return Ok(None);
                    }
                    let body = buf.split_to(len).to_vec();
                    self.head_bytes = 0;
                    return Ok(Some(head.into_request(body)));
                }
            }
        }
    }

    /// Splits one `\n`-terminated line off the front of `buf`.
    fn take_line(&mut self, buf: &mut BytesMut) -> Result<Option<String>, ParseError> {
        let Some(pos) = buf.iter().position(|&b| b == b'\n') else {
            if self.head_bytes + buf.len() > MAX_HEAD_SIZE {
                return Err(ParseError::HeadTooLarge);
            }
            return Ok(None);
        };

        self.head_bytes += pos + 1;
        if self.head_bytes > MAX_HEAD_SIZE {
            return Err(ParseError::HeadTooLarge);
        }

        let line = buf.split_to(pos + 1);
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

fn parse_request_line(line: &str) -> Result<Head, ParseError> {
    let mut parts = line.split(' ');
    let (Some(method), Some(path), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::InvalidRequestLine(line.to_string()));
    };

    if method.is_empty() || path.is_empty() {
        return Err(ParseError::InvalidRequestLine(line.to_string()));
    }

    Ok(Head {
        method: Method::from_token(method),
        path: path.to_string(),
        version: version.to_string(),
        headers: Headers::new(),
    })
}

/// Parses one complete request from the front of `buf`.
///
/// Returns the request and the number of bytes it occupied, or
/// `ParseError::Incomplete` if `buf` ends before the request does.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let mut bytes = BytesMut::from(buf);
    let mut decoder = RequestDecoder::new();

    match decoder.decode(&mut bytes)? {
        Some(request) => Ok((request, buf.len() - bytes.len())),
        None => Err(ParseError::Incomplete),
    }
}
