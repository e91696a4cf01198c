//! Ephemeral cookie sessions
//!
//! This module tracks repeat visits with an opaque `session` cookie. Nothing
//! here is persisted; restarting the process forgets every session.

pub mod cookie;
pub mod store;
pub mod sweeper;

pub use store::{Session, SessionStore};
pub use sweeper::spawn_sweeper;
