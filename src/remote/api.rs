//! Remote data-source capability and wire document types.
//!
//! The application core never talks to a network directly. It consumes an
//! injected [`RecipeApi`] capability with three operations: fetch a recipe by
//! id, fetch search results by query, and create a recipe from a draft. The
//! concrete transport lives behind the trait; [`crate::remote::http`] ships
//! the default HTTP implementation.
//!
//! Wire documents keep the remote source's field names (`cooking_time`,
//! `source_url`, ...) via serde and are normalized into domain types by the
//! event handler before any state is committed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Ingredient, Recipe, SearchResult};

/// Transport-level failure reported by a [`RecipeApi`] implementation.
///
/// Kept separate from [`crate::domain::LadleError`]: the handler maps fetch
/// failures to `DataUnavailable` and create failures to `UploadRejected`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The endpoint could not be reached or the connection failed.
    #[error("request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("server responded with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided error message, possibly empty.
        message: String,
    },

    /// The response body could not be decoded into the expected document.
    #[error("invalid response document: {0}")]
    Decode(String),
}

/// Full recipe document as returned by the remote source.
///
/// Field names follow the wire format; [`into_recipe`](Self::into_recipe)
/// renames them into the internal [`Recipe`] shape and validates required
/// invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDocument {
    /// Externally assigned identifier.
    pub id: String,

    /// Recipe title.
    pub title: String,

    /// Publisher attribution.
    pub publisher: String,

    /// URL of the original recipe page.
    pub source_url: String,

    /// URL of the recipe image.
    pub image_url: String,

    /// Number of servings.
    pub servings: u32,

    /// Preparation time in minutes, wire name `cooking_time`.
    pub cooking_time: u32,

    /// Ingredient entries.
    pub ingredients: Vec<Ingredient>,

    /// Write-access credential; absent on public recipes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl RecipeDocument {
    /// Normalizes the wire document into a domain [`Recipe`].
    ///
    /// Renames `cooking_time` to `cooking_minutes`, drops the wire layout, and
    /// sets the derived `bookmarked` flag from the caller's membership test.
    ///
    /// # Errors
    ///
    /// Returns a message describing the violated invariant when the document
    /// is unusable (empty id or title, zero servings). The caller maps this
    /// to [`crate::domain::LadleError::DataUnavailable`].
    pub fn into_recipe(self, bookmarked: bool) -> std::result::Result<Recipe, String> {
        if self.id.is_empty() {
            return Err("recipe document has an empty id".to_string());
        }
        if self.title.is_empty() {
            return Err(format!("recipe {} has an empty title", self.id));
        }
        if self.servings < 1 {
            return Err(format!("recipe {} reports zero servings", self.id));
        }

        Ok(Recipe {
            id: self.id,
            title: self.title,
            publisher: self.publisher,
            source_url: self.source_url,
            image_url: self.image_url,
            cooking_minutes: self.cooking_time,
            servings: self.servings,
            ingredients: self.ingredients,
            key: self.key,
            bookmarked,
        })
    }
}

/// Search hit document as returned by the query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Identifier joining the hit to its full recipe.
    pub id: String,

    /// Recipe title.
    pub title: String,

    /// Publisher attribution.
    pub publisher: String,

    /// URL of the recipe image.
    pub image_url: String,
}

impl SearchHit {
    /// Normalizes the wire hit into a domain [`SearchResult`].
    #[must_use]
    pub fn into_result(self) -> SearchResult {
        SearchResult {
            id: self.id,
            title: self.title,
            publisher: self.publisher,
            image_url: self.image_url,
        }
    }
}

/// Draft recipe document sent to the create endpoint.
///
/// This is the parsed, structured form of a user draft: ingredients have
/// already been validated and split locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftDocument {
    /// Recipe title.
    pub title: String,

    /// URL of the original recipe page.
    pub source_url: String,

    /// URL of the recipe image.
    pub image_url: String,

    /// Publisher attribution.
    pub publisher: String,

    /// Preparation time in minutes, wire name `cooking_time`.
    pub cooking_time: u32,

    /// Number of servings.
    pub servings: u32,

    /// Parsed ingredient entries.
    pub ingredients: Vec<Ingredient>,
}

/// Injected remote data-source capability.
///
/// Implementations must be `Send + Sync`; the session runtime owns one behind
/// a `Box`. Each method either returns a fully buffered wire document or
/// fails -- partial documents are never handed to the core.
///
/// # Implementations
///
/// - [`HttpRecipeApi`](crate::remote::http::HttpRecipeApi): HTTP backend (default)
/// - Test doubles implementing the trait directly (see `tests/session_flow.rs`)
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Fetches the full recipe document for `id`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the fetch or decode fails.
    async fn get_recipe(&self, id: &str) -> std::result::Result<RecipeDocument, ApiError>;

    /// Fetches search hits for `query`, in relevance order.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the fetch or decode fails.
    async fn get_results(&self, query: &str) -> std::result::Result<Vec<SearchHit>, ApiError>;

    /// Submits a draft document and returns the created recipe, including its
    /// externally assigned id.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the write is rejected.
    async fn post_recipe(
        &self,
        draft: &DraftDocument,
    ) -> std::result::Result<RecipeDocument, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> RecipeDocument {
        RecipeDocument {
            id: "abc123".to_string(),
            title: "Focaccia".to_string(),
            publisher: "Test Kitchen".to_string(),
            source_url: "https://example.com".to_string(),
            image_url: "https://example.com/i.jpg".to_string(),
            servings: 6,
            cooking_time: 45,
            ingredients: vec![],
            key: None,
        }
    }

    #[test]
    fn normalization_renames_wire_fields() {
        let recipe = document().into_recipe(true).unwrap();
        assert_eq!(recipe.cooking_minutes, 45);
        assert!(recipe.bookmarked);
    }

    #[test]
    fn zero_servings_document_is_rejected() {
        let mut doc = document();
        doc.servings = 0;
        assert!(doc.into_recipe(false).is_err());
    }

    #[test]
    fn missing_key_field_deserializes_as_none() {
        let json = r#"{
            "id": "abc",
            "title": "Bread",
            "publisher": "p",
            "source_url": "s",
            "image_url": "i",
            "servings": 2,
            "cooking_time": 30,
            "ingredients": []
        }"#;
        let doc: RecipeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.key, None);
    }
}
