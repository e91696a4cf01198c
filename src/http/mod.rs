//! HTTP protocol implementation.
//!
//! This module implements the HTTP/1.1 wire layer directly on top of a byte
//! stream, with support for keep-alive connections and gzip responses.
//!
//! # Architecture
//!
//! - **`connection`**: per-connection request/response state machine
//! - **`parser`**: incremental request decoder
//! - **`request`** / **`headers`**: parsed request representation
//! - **`response`**: response representation with builder pattern
//! - **`writer`**: serializes responses, applying gzip and `Content-Length`
//! - **`negotiate`**: `Accept-Encoding` handling and gzip compression
//! - **`mime`**: content type detection based on file extensions
//! - **`error`**: transport and protocol failures
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← request line, headers, body
//!        └──────┬──────┘
//!               │ Request decoded (malformed → 400 + close)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← sessions, routing
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← head, then body
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Connection: close → Closed
//! ```
//!
//! Read or write failures leave the loop without a response.

pub mod connection;
pub mod error;
pub mod headers;
pub mod mime;
pub mod negotiate;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
