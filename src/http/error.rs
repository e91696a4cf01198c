use thiserror::Error;

use crate::http::parser::ParseError;

/// Why a connection stopped before finishing an exchange.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("malformed request: {0}")]
    Parse(#[from] ParseError),

    #[error("peer closed the connection mid-request")]
    UnexpectedEof,

    #[error("{0} deadline elapsed")]
    Timeout(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
