//! HTTP implementation of the [`RecipeApi`] capability.
//!
//! Talks to a forkify-style recipe service: `GET {base}/recipes/{id}`,
//! `GET {base}/recipes?search={query}` and `POST {base}/recipes`. Responses
//! are wrapped in a `{ "status": ..., "data": { ... } }` envelope; error
//! responses carry a `message` field that is surfaced through
//! [`ApiError::Status`].

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::api::{ApiError, DraftDocument, RecipeApi, RecipeDocument, SearchHit};

/// Default request timeout. Matches the original application's fetch guard.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP backend for the remote recipe service.
///
/// Cheap to construct; holds a pooled [`reqwest::Client`]. The optional write
/// key is appended to every request so user-owned recipes are visible in
/// searches and uploads are authorized.
pub struct HttpRecipeApi {
    client: reqwest::Client,
    base_url: String,
    key: Option<String>,
}

/// Response envelope wrapping a single recipe document.
#[derive(Debug, Deserialize)]
struct RecipeEnvelope {
    data: RecipeData,
}

#[derive(Debug, Deserialize)]
struct RecipeData {
    recipe: RecipeDocument,
}

/// Response envelope wrapping a list of search hits.
#[derive(Debug, Deserialize)]
struct ResultsEnvelope {
    data: ResultsData,
}

#[derive(Debug, Deserialize)]
struct ResultsData {
    recipes: Vec<SearchHit>,
}

/// Error body sent by the service on non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: String,
}

impl HttpRecipeApi {
    /// Creates a backend for `base_url` (no trailing slash) with an optional
    /// write-access key.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, key: Option<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            key,
        })
    }

    /// Appends the configured key as a `key` query parameter if present.
    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        }
    }

    /// Checks the response status, extracting the service's error message on
    /// failure.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorEnvelope>()
            .await
            .map(|e| e.message)
            .unwrap_or_default();

        tracing::debug!(status = status.as_u16(), message = %message, "request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn get_recipe(&self, id: &str) -> Result<RecipeDocument, ApiError> {
        let url = format!("{}/recipes/{id}", self.base_url);
        tracing::debug!(url = %url, "fetching recipe");

        let request = self.with_key(self.client.get(&url));
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let envelope: RecipeEnvelope = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(envelope.data.recipe)
    }

    async fn get_results(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        let url = format!("{}/recipes", self.base_url);
        tracing::debug!(url = %url, query = %query, "fetching search results");

        let request = self.with_key(self.client.get(&url).query(&[("search", query)]));
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let envelope: ResultsEnvelope = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        tracing::debug!(hit_count = envelope.data.recipes.len(), "search results fetched");
        Ok(envelope.data.recipes)
    }

    async fn post_recipe(&self, draft: &DraftDocument) -> Result<RecipeDocument, ApiError> {
        let url = format!("{}/recipes", self.base_url);
        tracing::debug!(url = %url, title = %draft.title, "uploading recipe");

        let request = self.with_key(self.client.post(&url).json(draft));
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let envelope: RecipeEnvelope = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(envelope.data.recipe)
    }
}
