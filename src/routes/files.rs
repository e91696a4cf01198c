//! `/files` handlers.
//!
//! The listing (`/files`, `/files/`) answers GET only; other methods get 405.
//! On `/files/{name}` the name is decoded and checked for containment before
//! the method is looked at, so a bad name is a 400 or 403 whatever the
//! method. Only then are GET, POST and DELETE served, and anything else is 405.

use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::store::listing::render_listing;
use crate::store::{FileStore, StoreError};

fn failure(err: StoreError, req: &Request) -> Response {
    match &err {
        StoreError::Io { .. } => {
            tracing::error!(error = %err, method = %req.method, path = %req.path, "Storage failure");
        }
        StoreError::Forbidden(name) => {
            tracing::warn!(name = %name, path = %req.path, "Rejected path outside storage root");
        }
        _ => {
            tracing::debug!(error = %err, path = %req.path, "File request refused");
        }
    }
    err.into_response()
}

/// `GET /files` and `GET /files/`.
pub async fn list(store: &FileStore, req: &Request) -> Response {
    if req.method != Method::GET {
        return Response::method_not_allowed();
    }

    match store.list().await {
        Ok(names) => ResponseBuilder::new(StatusCode::Ok)
            .content_type("text/html")
            .body(render_listing(&names))
            .build(),
        Err(e) => failure(e, req),
    }
}

/// `GET`, `POST` and `DELETE` on `/files/{name}`.
pub async fn handle(store: &FileStore, req: &Request, name: &str) -> Response {
    if let Err(e) = store.resolve(name) {
        return failure(e, req);
    }

    match req.method {
        Method::GET => match store.read(name).await {
            Ok(file) => ResponseBuilder::new(StatusCode::Ok)
                .content_type(file.content_type)
                .body(file.data)
                .build(),
            Err(e) => failure(e, req),
        },

        Method::POST => match store.write(name, &req.body).await {
            Ok(path) => {
                tracing::debug!(path = %path.display(), bytes = req.body.len(), "File written");
                Response::text(StatusCode::Created, "File created")
            }
            Err(e) => failure(e, req),
        },

        Method::DELETE => match store.delete(name).await {
            Ok(()) => Response::ok("File deleted"),
            Err(e) => failure(e, req),
        },

        _ => Response::method_not_allowed(),
    }
}
