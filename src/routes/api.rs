use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::routes::{ApiRoute, ExchangeContext};

#[derive(Debug, Serialize)]
struct StatusBody {
    status: &'static str,
    time: String,
}

#[derive(Debug, Serialize)]
struct TimeBody {
    time: String,
}

#[derive(Debug, Serialize)]
struct SessionBody<'a> {
    session_id: &'a str,
    created_at: String,
    age: String,
    age_ms: u64,
}

fn rfc3339(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn to_json<T: Serialize>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => Response::json(body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize JSON body");
            Response::internal_error("Internal Server Error")
        }
    }
}

pub fn handle(route: ApiRoute, req: &Request, ctx: &ExchangeContext) -> Response {
    match route {
        ApiRoute::Status => {
            if req.method != Method::GET {
                return Response::method_not_allowed();
            }
            to_json(&StatusBody {
                status: "ok",
                time: rfc3339(Utc::now()),
            })
        }

        ApiRoute::Time => {
            if req.method != Method::GET {
                return Response::method_not_allowed();
            }
            to_json(&TimeBody {
                time: rfc3339(Utc::now()),
            })
        }

        ApiRoute::Echo => match req.method {
            Method::POST | Method::PUT => ResponseBuilder::new(StatusCode::Ok)
                .content_type("application/json")
                .body(req.body.clone())
                .build(),
            _ => Response::method_not_allowed(),
        },

        ApiRoute::Session => {
            let Some(session) = &ctx.session else {
                return Response::not_found();
            };
            if req.method != Method::GET {
                return Response::method_not_allowed();
            }
            let age = session.age();
            to_json(&SessionBody {
                session_id: &session.id,
                created_at: rfc3339(session.created_at),
                age: format!("{:?}", age),
                age_ms: u64::try_from(age.as_millis()).unwrap_or(u64::MAX),
            })
        }
    }
}
