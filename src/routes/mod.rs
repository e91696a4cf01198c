//! Request routing
//!
//! A fixed, ordered route table matched against the literal request target
//! (query string included). The first matching rule wins:
//!
//! | order | path                  | match  |
//! |-------|-----------------------|--------|
//! | 1     | `/`                   | exact  |
//! | 2     | `/echo/`              | prefix |
//! | 3     | `/user-agent`         | exact  |
//! | 4     | `/api/{status,time,echo,session}` | exact |
//! | 5     | `/files`, `/files/…`  | prefix |
//! | 6     | anything else         | 404    |
//!
//! The router only builds the [`Response`]; keep-alive and content
//! encoding are carried in [`ExchangeContext`] and applied by the writer.

pub mod api;
pub mod files;

use std::net::SocketAddr;

use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::http::writer::Encoding;
use crate::session::Session;
use crate::store::FileStore;

pub const WELCOME: &str = "Welcome to the burrow server";

/// JSON endpoints under `/api/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoute {
    Status,
    Time,
    Echo,
    Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Root,
    Echo(&'a str),
    UserAgent,
    Api(ApiRoute),
    FileListing,
    /// Raw, still-encoded resource name.
    File(&'a str),
    NotFound,
}

/// Maps a request target to its route.
pub fn match_route(path: &str) -> Route<'_> {
    if path == "/" {
        return Route::Root;
    }
    if let Some(rest) = path.strip_prefix("/echo/") {
        return Route::Echo(rest);
    }
    if path == "/user-agent" {
        return Route::UserAgent;
    }

    let api = match path {
        "/api/status" => Some(ApiRoute::Status),
        "/api/time" => Some(ApiRoute::Time),
        "/api/echo" => Some(ApiRoute::Echo),
        "/api/session" => Some(ApiRoute::Session),
        _ => None,
    };
    if let Some(api) = api {
        return Route::Api(api);
    }

    match path {
        "/files" | "/files/" => Route::FileListing,
        _ => match path.strip_prefix("/files/") {
            Some(name) => Route::File(name),
            None => Route::NotFound,
        },
    }
}

/// Everything a handler knows about the exchange besides the request.
#[derive(Debug, Clone, Default)]
pub struct ExchangeContext {
    pub peer: Option<SocketAddr>,
    pub encoding: Encoding,
    /// Present when session support is on.
    pub session: Option<Session>,
}

/// Dispatches requests to the static, API and file handlers.
#[derive(Debug, Clone)]
pub struct Router {
    files: FileStore,
}

impl Router {
    pub fn new(files: FileStore) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub async fn dispatch(&self, req: &Request, ctx: &ExchangeContext) -> Response {
        match match_route(&req.path) {
            Route::Root => Response::ok(WELCOME),

            Route::Echo(rest) => Response::ok(rest),

            Route::UserAgent => {
                if req.method != Method::GET {
                    return Response::method_not_allowed();
                }
                Response::ok(req.user_agent())
            }

            Route::Api(api) => api::handle(api, req, ctx),

            Route::FileListing => files::list(&self.files, req).await,

            Route::File(name) => files::handle(&self.files, req, name).await,

            Route::NotFound => Response::not_found(),
        }
    }
}
