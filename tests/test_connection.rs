//! Connection state machine driven over in-memory duplex pipes

use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

use burrow::http::connection::Connection;
use burrow::http::error::HttpError;
use burrow::routes::Router;
use burrow::server::{AppState, Timeouts};
use burrow::store::FileStore;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn app(timeouts: Timeouts) -> (TempDir, Arc<AppState>) {
    let dir = TempDir::new().unwrap();
    let files = FileStore::new(dir.path()).unwrap();
    let app = Arc::new(AppState::new(Router::new(files), None, timeouts));
    (dir, app)
}

#[tokio::test]
async fn test_run_returns_ok_when_peer_leaves_between_requests() {
    let (_dir, app) = app(Timeouts::default());
    let (mut client, server) = tokio::io::duplex(4096);

    let task = tokio::spawn(async move { Connection::new(server, None, app).run().await });

    client
        .write_all(b"GET /echo/hi HTTP/1.1\r\n\r\n")
        .await
        .unwrap();
    client.shutdown().await.unwrap();

    let mut raw = Vec::new();
    client.read_to_end(&mut raw).await.unwrap();
    let raw = String::from_utf8(raw).unwrap();
    assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(raw.ends_with("\r\n\r\nhi"));

    assert!(task.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_write_failure_abandons_connection() {
    let (dir, app) = app(Timeouts::default());
    let (mut client, server) = tokio::io::duplex(4096);

    // two requests queued, then the peer goes away entirely
    client
        .write_all(
            b"GET /echo/first HTTP/1.1\r\n\r\n\
              POST /files/after.txt HTTP/1.1\r\nContent-Length: 1\r\n\r\nx",
        )
        .await
        .unwrap();
    drop(client);

    let result = Connection::new(server, None, app).run().await;

    assert!(
        matches!(&result, Err(HttpError::Io(e)) if e.kind() == ErrorKind::BrokenPipe),
        "{result:?}"
    );
    assert!(!dir.path().join("after.txt").exists());
}

#[tokio::test]
async fn test_write_deadline_elapses_on_stalled_reader() {
    let timeouts = Timeouts {
        read: None,
        write: Some(Duration::from_millis(50)),
    };
    let (_dir, app) = app(timeouts);
    // pipe smaller than the response head; the client reads only after the deadline
    let (mut client, server) = tokio::io::duplex(16);

    let task = tokio::spawn(async move { Connection::new(server, None, app).run().await });

    client
        .write_all(b"GET /echo/long-enough-to-fill-the-pipe HTTP/1.1\r\n\r\n")
        .await
        .unwrap();

    let result = task.await.unwrap();
    assert!(matches!(result, Err(HttpError::Timeout("write"))), "{result:?}");

    // only the first 16 bytes of the head ever left the server
    let mut raw = Vec::new();
    client.read_to_end(&mut raw).await.unwrap();
    assert_eq!(raw.len(), 16);
}
