use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::http::error::HttpError;
use crate::http::negotiate::accepts_gzip;
use crate::http::parser::RequestDecoder;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::{Encoding, ResponseWriter};
use crate::routes::ExchangeContext;
use crate::server::state::AppState;
use crate::session::cookie;

const SECURITY_HEADERS: [(&str, &str); 3] = [
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "DENY"),
    ("X-XSS-Protection", "1; mode=block"),
];

pub struct Connection<S> {
    stream: S,
    peer: Option<SocketAddr>,
    buffer: BytesMut,
    decoder: RequestDecoder,
    state: ConnectionState,
    app: Arc<AppState>,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = close after write?
    Closed,
}

/// Runs `fut` under an optional deadline; expiry is a transport failure.
async fn with_deadline<F, T>(
    limit: Option<Duration>,
    what: &'static str,
    fut: F,
) -> Result<T, HttpError>
where
    F: Future<Output = io::Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| HttpError::Timeout(what))?
            .map_err(HttpError::from),
        None => fut.await.map_err(HttpError::from),
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: Option<SocketAddr>, app: Arc<AppState>) -> Self {
        Self {
            stream,
            peer,
            buffer: BytesMut::with_capacity(4096),
            decoder: RequestDecoder::new(),
            state: ConnectionState::Reading,
            app,
        }
    }

    /// Serves requests until the peer leaves, asks to close, or the
    /// transport fails. The stream is released when `self` is dropped,
    /// whichever way this returns.
    pub async fn run(&mut self) -> Result<(), HttpError> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => match self.read_request().await {
                    Ok(Some(req)) => {
                        self.state = ConnectionState::Processing(req);
                    }
                    Ok(None) => {
                        self.state = ConnectionState::Closed;
                    }
                    Err(HttpError::Parse(e)) => {
                        warn!(peer = ?self.peer, error = %e, "Malformed request");
                        let encoding = Encoding {
                            gzip: false,
                            close: true,
                        };
                        let writer =
                            ResponseWriter::new(Response::bad_request("Bad Request"), encoding)?;
                        self.state = ConnectionState::Writing(writer, true);
                    }
                    Err(e) => return Err(e),
                },

                ConnectionState::Processing(req) => {
                    let (writer, close) = self.process(req).await?;
                    self.state = ConnectionState::Writing(writer, close);
                }

                ConnectionState::Writing(writer, close) => {
                    self.write_response(&writer).await?;

                    if close {
                        self.state = ConnectionState::Closed;
                    } else {
                        self.state = ConnectionState::Reading; // go back for next request
                    }
                }

                ConnectionState::Closed => {
                    let _ = self.stream.shutdown().await;
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until one full request is buffered.
    ///
    /// `Ok(None)` means the peer closed cleanly between requests.
    pub async fn read_request(&mut self) -> Result<Option<Request>, HttpError> {
        loop {
            if let Some(request) = self.decoder.decode(&mut self.buffer)? {
                return Ok(Some(request));
            }

            let n = with_deadline(
                self.app.timeouts.read,
                "read",
                self.stream.read_buf(&mut self.buffer),
            )
            .await?;

            if n == 0 {
                if self.decoder.is_idle() && self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(HttpError::UnexpectedEof);
            }
        }
    }

    async fn process(&self, req: Request) -> io::Result<(ResponseWriter, bool)> {
        let encoding = Encoding {
            gzip: accepts_gzip(req.header("Accept-Encoding")),
            close: req.wants_close(),
        };

        info!(peer = ?self.peer, method = %req.method, path = %req.path, "Request");

        let mut ctx = ExchangeContext {
            peer: self.peer,
            encoding,
            session: None,
        };
        let mut set_cookie = None;

        if let Some(sessions) = &self.app.sessions {
            let (session, created) = sessions.resume(cookie::session_id(req.header("Cookie")));
            if created {
                set_cookie = Some(cookie::set_cookie(&session.id));
            }
            ctx.session = Some(session);
        }

        let mut response = self.app.router.dispatch(&req, &ctx).await;

        if ctx.session.is_some() {
            if let Some(value) = set_cookie {
                response.headers.insert("Set-Cookie", value);
            }
            for (name, value) in SECURITY_HEADERS {
                response.headers.insert(name, value);
            }
        }

        debug!(
            peer = ?self.peer,
            status = response.status.as_u16(),
            gzip = encoding.gzip,
            close = encoding.close,
            "Response ready"
        );

        let writer = ResponseWriter::new(response, encoding)?;
        Ok((writer, encoding.close))
    }

    async fn write_response(&mut self, writer: &ResponseWriter) -> Result<(), HttpError> {
        let result = with_deadline(
            self.app.timeouts.write,
            "write",
            writer.write_to_stream(&mut self.stream),
        )
        .await;

        if let Err(e) = &result {
            warn!(peer = ?self.peer, error = %e, "Failed to write response, abandoning exchange");
        }
        result
    }
}
