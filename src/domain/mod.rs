//! Domain layer for the ladle application core.
//!
//! This module contains the core domain types and business rules, independent
//! of transport, persistence, or rendering concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`recipe`]: Recipe, ingredient, and search-result models
//! - [`draft`]: Draft recipes and ingredient-string parsing

pub mod draft;
pub mod error;
pub mod recipe;

pub use draft::RecipeDraft;
pub use error::{LadleError, Result};
pub use recipe::{Ingredient, Recipe, SearchResult};
