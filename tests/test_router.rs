//! Tests for request dispatch

use burrow::http::request::{Method, Request, RequestBuilder};
use burrow::http::response::StatusCode;
use burrow::routes::{ExchangeContext, Router, WELCOME};
use burrow::session::SessionStore;
use burrow::store::FileStore;
use tempfile::TempDir;

fn router() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let router = Router::new(FileStore::new(dir.path()).unwrap());
    (dir, router)
}

fn request(method: Method, path: &str) -> Request {
    RequestBuilder::new().method(method).path(path).build().unwrap()
}

#[tokio::test]
async fn test_root_answers_any_method() {
    let (_dir, router) = router();
    let ctx = ExchangeContext::default();

    for method in [Method::GET, Method::POST, Method::Other("BREW".into())] {
        let resp = router.dispatch(&request(method, "/"), &ctx).await;
        assert_eq!(resp.status, StatusCode::Ok);
        assert_eq!(resp.body, WELCOME.as_bytes());
    }
}

#[tokio::test]
async fn test_echo_returns_remainder_verbatim() {
    let (_dir, router) = router();
    let ctx = ExchangeContext::default();

    for s in ["abc", "hello%20world", "", "a.b-c_d"] {
        let resp = router
            .dispatch(&request(Method::GET, &format!("/echo/{s}")), &ctx)
            .await;
        assert_eq!(resp.status, StatusCode::Ok);
        assert_eq!(resp.header("Content-Type"), Some("text/plain"));
        assert_eq!(resp.body, s.as_bytes());
    }
}

#[tokio::test]
async fn test_user_agent_is_get_only() {
    let (_dir, router) = router();
    let ctx = ExchangeContext::default();

    let req = RequestBuilder::new()
        .method(Method::GET)
        .path("/user-agent")
        .header("user-agent", "X")
        .build()
        .unwrap();
    let resp = router.dispatch(&req, &ctx).await;
    assert_eq!(resp.body, b"X");

    let resp = router.dispatch(&request(Method::GET, "/user-agent"), &ctx).await;
    assert_eq!(resp.status, StatusCode::Ok);
    assert!(resp.body.is_empty());

    let resp = router.dispatch(&request(Method::POST, "/user-agent"), &ctx).await;
    assert_eq!(resp.status, StatusCode::MethodNotAllowed);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let (_dir, router) = router();
    let resp = router
        .dispatch(&request(Method::GET, "/nonexistent"), &ExchangeContext::default())
        .await;
    assert_eq!(resp.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_api_status_and_time() {
    let (_dir, router) = router();
    let ctx = ExchangeContext::default();

    let resp = router.dispatch(&request(Method::GET, "/api/status"), &ctx).await;
    assert_eq!(resp.header("Content-Type"), Some("application/json"));
    let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["time"].as_str().unwrap().ends_with('Z'));

    let resp = router.dispatch(&request(Method::GET, "/api/time"), &ctx).await;
    let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
    assert!(body["time"].is_string());

    let resp = router.dispatch(&request(Method::DELETE, "/api/time"), &ctx).await;
    assert_eq!(resp.status, StatusCode::MethodNotAllowed);
}

#[tokio::test]
async fn test_api_echo_methods() {
    let (_dir, router) = router();
    let ctx = ExchangeContext::default();

    for method in [Method::POST, Method::PUT] {
        let req = RequestBuilder::new()
            .method(method)
            .path("/api/echo")
            .body(br#"{"a":1}"#.to_vec())
            .build()
            .unwrap();
        let resp = router.dispatch(&req, &ctx).await;
        assert_eq!(resp.status, StatusCode::Ok);
        assert_eq!(resp.body, br#"{"a":1}"#);
    }

    let resp = router.dispatch(&request(Method::GET, "/api/echo"), &ctx).await;
    assert_eq!(resp.status, StatusCode::MethodNotAllowed);
}

#[tokio::test]
async fn test_api_session_reports_context_session() {
    let (_dir, router) = router();
    let store = SessionStore::default();
    let session = store.create();
    let ctx = ExchangeContext {
        session: Some(session.clone()),
        ..Default::default()
    };

    let resp = router.dispatch(&request(Method::GET, "/api/session"), &ctx).await;
    let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
    assert_eq!(body["session_id"], session.id.as_str());
    assert!(body["age_ms"].is_u64());

    // sessions disabled
    let resp = router
        .dispatch(&request(Method::GET, "/api/session"), &ExchangeContext::default())
        .await;
    assert_eq!(resp.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_files_routes() {
    let (_dir, router) = router();
    let ctx = ExchangeContext::default();

    let post = RequestBuilder::new()
        .method(Method::POST)
        .path("/files/test.txt")
        .body(b"payload".to_vec())
        .build()
        .unwrap();
    let resp = router.dispatch(&post, &ctx).await;
    assert_eq!(resp.status, StatusCode::Created);

    let resp = router.dispatch(&request(Method::GET, "/files/test.txt"), &ctx).await;
    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.header("Content-Type"), Some("text/plain"));
    assert_eq!(resp.body, b"payload");

    let resp = router.dispatch(&request(Method::PUT, "/files/test.txt"), &ctx).await;
    assert_eq!(resp.status, StatusCode::MethodNotAllowed);

    for listing in ["/files", "/files/"] {
        let resp = router.dispatch(&request(Method::GET, listing), &ctx).await;
        assert_eq!(resp.status, StatusCode::Ok);
        assert_eq!(resp.header("Content-Type"), Some("text/html"));
        let html = String::from_utf8(resp.body).unwrap();
        assert!(html.contains("href=\"/files/test.txt\""));
    }

    let resp = router.dispatch(&request(Method::DELETE, "/files/test.txt"), &ctx).await;
    assert_eq!(resp.status, StatusCode::Ok);

    let resp = router.dispatch(&request(Method::DELETE, "/files/test.txt"), &ctx).await;
    assert_eq!(resp.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_files_traversal_and_encoding_errors() {
    let (_dir, router) = router();
    let ctx = ExchangeContext::default();

    for path in ["/files/../../etc/passwd", "/files/%2e%2e/%2e%2e/etc/passwd"] {
        let resp = router.dispatch(&request(Method::GET, path), &ctx).await;
        assert_eq!(resp.status, StatusCode::Forbidden, "{path}");
    }

    let resp = router.dispatch(&request(Method::GET, "/files/%zz"), &ctx).await;
    assert_eq!(resp.status, StatusCode::BadRequest);
}

#[tokio::test]
async fn test_files_name_checked_before_method() {
    let (_dir, router) = router();
    let ctx = ExchangeContext::default();

    for method in [Method::PUT, Method::PATCH, Method::Other("BREW".into())] {
        let resp = router
            .dispatch(&request(method.clone(), "/files/../../etc/passwd"), &ctx)
            .await;
        assert_eq!(resp.status, StatusCode::Forbidden, "{method}");

        let resp = router
            .dispatch(&request(method.clone(), "/files/%2e%2e/secret"), &ctx)
            .await;
        assert_eq!(resp.status, StatusCode::Forbidden, "{method}");

        let resp = router.dispatch(&request(method.clone(), "/files/%zz"), &ctx).await;
        assert_eq!(resp.status, StatusCode::BadRequest, "{method}");

        let resp = router.dispatch(&request(method, "/files/ok.txt"), &ctx).await;
        assert_eq!(resp.status, StatusCode::MethodNotAllowed);
    }
}

#[tokio::test]
async fn test_files_listing_is_get_only() {
    let (_dir, router) = router();
    let ctx = ExchangeContext::default();

    for method in [Method::POST, Method::DELETE] {
        let resp = router.dispatch(&request(method, "/files/"), &ctx).await;
        assert_eq!(resp.status, StatusCode::MethodNotAllowed);
    }
}
