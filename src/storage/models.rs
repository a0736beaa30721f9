//! Serialized storage formats.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::Recipe;

/// On-disk bookmark container format.
///
/// Wraps the bookmark list in a versioned object for future migrations. The
/// whole container is rewritten on every bookmark mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkFile {
    /// Storage format version.
    pub version: u32,

    /// Unix timestamp of the last write.
    pub saved_at: i64,

    /// The full bookmark set, in insertion order.
    #[serde(default)]
    pub bookmarks: Vec<Recipe>,
}

/// Current bookmark container version.
pub const BOOKMARK_FILE_VERSION: u32 = 1;

impl BookmarkFile {
    /// Wraps `bookmarks` in a container stamped with the current time.
    #[must_use]
    pub fn now(bookmarks: Vec<Recipe>) -> Self {
        Self {
            version: BOOKMARK_FILE_VERSION,
            saved_at: Utc::now().timestamp(),
            bookmarks,
        }
    }

    /// Serializes the container for storage.
    ///
    /// Serialization of these types cannot fail in practice; a failure is
    /// logged and yields an empty container string so persistence degrades
    /// rather than aborting the event that triggered it.
    #[must_use]
    pub fn encode(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(error) => {
                tracing::error!(error = %error, "bookmark serialization failed");
                String::new()
            }
        }
    }

    /// Decodes a stored container, tolerating corruption.
    ///
    /// Unparseable input yields an empty bookmark list with a warning:
    /// a damaged store must never prevent the session from starting.
    #[must_use]
    pub fn decode(raw: &str) -> Vec<Recipe> {
        match serde_json::from_str::<Self>(raw) {
            Ok(file) => {
                tracing::debug!(
                    version = file.version,
                    count = file.bookmarks.len(),
                    "bookmarks decoded"
                );
                file.bookmarks
            }
            Err(error) => {
                tracing::warn!(error = %error, "corrupt bookmark data, starting empty");
                Vec::new()
            }
        }
    }
}
