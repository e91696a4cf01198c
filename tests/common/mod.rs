//! Shared harness: an in-process server on an ephemeral port and a raw
//! HTTP/1.1 client that reads responses off the socket by hand.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use burrow::http::headers::Headers;
use burrow::routes::Router;
use burrow::server::listener::serve;
use burrow::server::{AppState, Timeouts};
use burrow::session::SessionStore;
use burrow::store::FileStore;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub struct TestServer {
    pub addr: SocketAddr,
    pub dir: TempDir,
    pub sessions: Option<Arc<SessionStore>>,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestServer {
    pub async fn start(with_sessions: bool) -> Self {
        Self::start_with(with_sessions, Timeouts::default()).await
    }

    pub async fn start_with(with_sessions: bool, timeouts: Timeouts) -> Self {
        let dir = TempDir::new().unwrap();
        let files = FileStore::new(dir.path()).unwrap();
        let sessions = with_sessions.then(|| Arc::new(SessionStore::default()));
        let app = Arc::new(AppState::new(Router::new(files), sessions.clone(), timeouts));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = serve(listener, app).await;
        });

        Self {
            addr,
            dir,
            sessions,
            handle,
        }
    }

    pub async fn client(&self) -> Client {
        Client::connect(self.addr).await
    }
}

#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub struct Client {
    stream: BufReader<TcpStream>,
}

impl Client {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        Self {
            stream: BufReader::new(stream),
        }
    }

    pub async fn send(&mut self, raw: impl AsRef<[u8]>) {
        self.stream.get_mut().write_all(raw.as_ref()).await.unwrap();
    }

    /// Half-closes the write side so the server sees EOF.
    pub async fn finish_writing(&mut self) {
        self.stream.get_mut().shutdown().await.unwrap();
    }

    pub async fn request(&mut self, raw: impl AsRef<[u8]>) -> RawResponse {
        self.send(raw).await;
        self.read_response()
            .await
            .expect("server closed the connection instead of responding")
    }

    /// Reads one response, or `None` if the server closed first.
    pub async fn read_response(&mut self) -> Option<RawResponse> {
        let mut status_line = String::new();
        let n = tokio::time::timeout(
            Duration::from_secs(5),
            self.stream.read_line(&mut status_line),
        )
        .await
        .expect("timed out waiting for a response")
        .ok()?;
        if n == 0 {
            return None;
        }

        let mut parts = status_line.trim_end().splitn(3, ' ');
        let _version = parts.next()?;
        let status = parts.next()?.parse().ok()?;
        let reason = parts.next().unwrap_or("").to_string();

        let mut headers = Headers::new();
        loop {
            let mut line = String::new();
            self.stream.read_line(&mut line).await.ok()?;
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            let (name, value) = line.split_once(": ")?;
            headers.insert(name, value);
        }

        let len: usize = headers.get("Content-Length")?.parse().ok()?;
        let mut body = vec![0u8; len];
        self.stream.read_exact(&mut body).await.ok()?;

        Some(RawResponse {
            status,
            reason,
            headers,
            body,
        })
    }

    /// True once the server has closed its side of the connection.
    pub async fn is_closed(&mut self) -> bool {
        let mut byte = [0u8; 1];
        match tokio::time::timeout(Duration::from_secs(5), self.stream.read(&mut byte)).await {
            Ok(Ok(0)) | Ok(Err(_)) => true,
            Ok(Ok(_)) | Err(_) => false,
        }
    }
}

pub fn get(path: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n")
}
