//! Recipe domain model and serving-size scaling.
//!
//! This module defines the full [`Recipe`] detail record, its [`Ingredient`]
//! entries, and the lightweight [`SearchResult`] summary produced by queries.
//! A `SearchResult` is joinable to a full `Recipe` by `id`; the full record is
//! fetched separately on demand.
//!
//! Recipes are immutable except through two paths: wholesale replacement when
//! a load or upload completes, and serving-size scaling via
//! [`Recipe::update_servings`].

use serde::{Deserialize, Serialize};

use super::error::{LadleError, Result};

/// A single ingredient line within a recipe.
///
/// `quantity` is `None` for unmeasured ingredients ("salt to taste"); `unit`
/// may be empty. Scaling a recipe multiplies the quantity and never touches
/// unit or description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Amount of the ingredient, `None` when the source lists no quantity.
    pub quantity: Option<f64>,

    /// Measurement unit, possibly empty (e.g. `"cups"`, `"g"`, `""`).
    pub unit: String,

    /// Human-readable ingredient description.
    pub description: String,
}

/// Full detail record for one dish.
///
/// The identity `id` is stable and externally assigned. The `bookmarked`
/// field is derived state: it is recomputed against the bookmark set whenever
/// a recipe is installed as current, and never persisted by the remote
/// source. The optional `key` is the write-access credential echoed back by
/// the create endpoint for user-owned recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Stable, externally assigned identifier.
    pub id: String,

    /// Recipe title.
    pub title: String,

    /// Publisher or author attribution.
    pub publisher: String,

    /// URL of the original recipe page.
    pub source_url: String,

    /// URL of the recipe image.
    pub image_url: String,

    /// Preparation time in minutes.
    pub cooking_minutes: u32,

    /// Number of servings the ingredient quantities correspond to.
    ///
    /// Always at least 1; enforced at normalization and by
    /// [`update_servings`](Self::update_servings).
    pub servings: u32,

    /// Ordered ingredient list, in source order.
    pub ingredients: Vec<Ingredient>,

    /// Write-access credential, present only for user-created recipes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Derived membership flag against the bookmark set.
    #[serde(default)]
    pub bookmarked: bool,
}

impl Recipe {
    /// Rescales every ingredient quantity to a new serving count.
    ///
    /// Each non-null quantity becomes `quantity * new_servings / servings`;
    /// units and descriptions are unchanged. Pure scaling, no rounding --
    /// display formatting is a view concern.
    ///
    /// # Errors
    ///
    /// Returns [`LadleError::InvalidServings`] if `new_servings` is zero, in
    /// which case the recipe is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use ladle::domain::{Ingredient, Recipe};
    ///
    /// let mut recipe = Recipe {
    ///     id: "r1".into(),
    ///     title: "Pancakes".into(),
    ///     publisher: "test".into(),
    ///     source_url: String::new(),
    ///     image_url: String::new(),
    ///     cooking_minutes: 20,
    ///     servings: 4,
    ///     ingredients: vec![Ingredient {
    ///         quantity: Some(2.0),
    ///         unit: "cups".into(),
    ///         description: "flour".into(),
    ///     }],
    ///     key: None,
    ///     bookmarked: false,
    /// };
    ///
    /// recipe.update_servings(8).unwrap();
    /// assert_eq!(recipe.ingredients[0].quantity, Some(4.0));
    /// assert_eq!(recipe.servings, 8);
    /// ```
    pub fn update_servings(&mut self, new_servings: u32) -> Result<()> {
        if new_servings < 1 {
            return Err(LadleError::InvalidServings(new_servings));
        }

        let ratio = f64::from(new_servings) / f64::from(self.servings);
        for ingredient in &mut self.ingredients {
            if let Some(quantity) = ingredient.quantity {
                ingredient.quantity = Some(quantity * ratio);
            }
        }
        self.servings = new_servings;

        tracing::debug!(
            recipe_id = %self.id,
            servings = new_servings,
            "servings updated"
        );
        Ok(())
    }
}

/// Lightweight summary record returned by a search query.
///
/// Immutable once created; insertion order in a result list is the relevance
/// order reported by the remote source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifier joining this summary to its full [`Recipe`].
    pub id: String,

    /// Recipe title.
    pub title: String,

    /// Publisher or author attribution.
    pub publisher: String,

    /// URL of the recipe image.
    pub image_url: String,
}
