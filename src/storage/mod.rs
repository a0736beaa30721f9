//! Durable persistence for the bookmark set.
//!
//! The session writes the full bookmark container under a single key on
//! every bookmark mutation and reads it back once at start. Corrupt or
//! missing data always degrades to an empty set.
//!
//! # Modules
//!
//! - [`backend`]: [`KeyValueStore`] capability trait and the in-memory backend
//! - [`file`]: JSON file backend with atomic writes
//! - [`models`]: versioned serialization formats

pub mod backend;
pub mod file;
pub mod models;

pub use backend::{KeyValueStore, MemoryStore};
pub use file::JsonFileStore;
pub use models::BookmarkFile;
