//! Sandboxed file storage
//!
//! Exposes one directory as a flat namespace of named resources:
//!
//! - **`files`**: list, read, write and delete against the root
//! - **`path`**: percent-decoding and containment checks
//! - **`listing`**: HTML rendering of the root's entries
//! - **`error`**: error type with its HTTP status mapping

pub mod error;
pub mod files;
pub mod listing;
pub mod path;

pub use error::StoreError;
pub use files::{FileStore, StoredFile};
