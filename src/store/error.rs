use std::fmt;
use std::io;

use thiserror::Error;

use crate::http::response::{Response, StatusCode};

/// Storage operation that failed, used to pick the 500 body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Read,
    Write,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::List => "list directory",
            Operation::Read => "read file",
            Operation::Write => "write file",
            Operation::Delete => "delete file",
        })
    }
}

/// Resource store error type
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid percent-encoding in {0:?}")]
    InvalidEncoding(String),

    #[error("path escapes storage root: {0:?}")]
    Forbidden(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("failed to {op}: {source}")]
    Io {
        op: Operation,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn io(op: Operation, source: io::Error) -> Self {
        StoreError::Io { op, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::InvalidEncoding(_) => StatusCode::BadRequest,
            StoreError::Forbidden(_) => StatusCode::Forbidden,
            StoreError::NotFound(_) => StatusCode::NotFound,
            StoreError::Io { .. } => StatusCode::InternalServerError,
        }
    }

    /// Short fixed-text response; never includes paths or OS messages.
    pub fn into_response(self) -> Response {
        match self {
            StoreError::InvalidEncoding(_) => Response::bad_request("Invalid URL encoding"),
            StoreError::Forbidden(_) => Response::forbidden(),
            StoreError::NotFound(_) => Response::text(StatusCode::NotFound, "File not found"),
            StoreError::Io { op, .. } => Response::internal_error(match op {
                Operation::List => "Error reading directory",
                Operation::Read => "Error reading file",
                Operation::Write => "Error writing file",
                Operation::Delete => "Error deleting file",
            }),
        }
    }
}
