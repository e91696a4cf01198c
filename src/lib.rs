//! burrow - HTTP/1.1 file server on raw TCP
//!
//! Core library: wire codec, connection handling, routing, sandboxed file
//! storage and cookie sessions.

pub mod config;
pub mod http;
pub mod routes;
pub mod server;
pub mod session;
pub mod store;
