//! Remote data-source boundary.
//!
//! The core consumes the remote recipe service exclusively through the
//! [`RecipeApi`] trait; wire documents are normalized into domain types
//! before any state is committed.
//!
//! # Modules
//!
//! - [`api`]: Capability trait, wire documents, transport error type
//! - [`http`]: Default HTTP backend

pub mod api;
pub mod http;

pub use api::{ApiError, DraftDocument, RecipeApi, RecipeDocument, SearchHit};
pub use http::HttpRecipeApi;
