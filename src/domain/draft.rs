//! Draft recipes submitted through the add-recipe form.
//!
//! A [`RecipeDraft`] carries the raw form values, with each ingredient
//! supplied as a single delimited string of the form
//! `quantity,unit,description` (quantity may be empty). Validation and
//! parsing into structured [`Ingredient`] entries happen locally, before any
//! network write: a malformed entry or an empty ingredient list fails the
//! submission outright.

use super::error::{LadleError, Result};
use super::recipe::Ingredient;

/// Raw draft of a new recipe as supplied by the submission form.
///
/// Field values are unvalidated strings and numbers straight from the form;
/// [`parse_ingredients`](Self::parse_ingredients) turns the delimited
/// ingredient entries into structured data or reports the first offending
/// entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    /// Recipe title.
    pub title: String,

    /// URL of the original recipe page.
    pub source_url: String,

    /// URL of the recipe image.
    pub image_url: String,

    /// Publisher or author attribution.
    pub publisher: String,

    /// Preparation time in minutes.
    pub cooking_minutes: u32,

    /// Number of servings the quantities correspond to.
    pub servings: u32,

    /// Raw ingredient entries, each `"quantity,unit,description"`.
    ///
    /// Empty strings are permitted and filtered out during parsing.
    pub ingredients: Vec<String>,
}

impl RecipeDraft {
    /// Parses the raw ingredient strings into structured entries.
    ///
    /// Empty entries are filtered out first. Every remaining entry must split
    /// into exactly three comma-separated fields; the quantity field may be
    /// empty (parsed as `None`) or a number.
    ///
    /// # Errors
    ///
    /// - [`LadleError::MalformedIngredient`] naming the offending entry if it
    ///   does not split into three fields or its quantity is not numeric.
    /// - [`LadleError::EmptyIngredientList`] if no entries remain after
    ///   filtering.
    ///
    /// # Examples
    ///
    /// ```
    /// use ladle::domain::RecipeDraft;
    ///
    /// let draft = RecipeDraft {
    ///     title: "Soup".into(),
    ///     source_url: String::new(),
    ///     image_url: String::new(),
    ///     publisher: "me".into(),
    ///     cooking_minutes: 15,
    ///     servings: 2,
    ///     ingredients: vec![",pinch,salt".into()],
    /// };
    ///
    /// let parsed = draft.parse_ingredients().unwrap();
    /// assert_eq!(parsed[0].quantity, None);
    /// assert_eq!(parsed[0].unit, "pinch");
    /// assert_eq!(parsed[0].description, "salt");
    /// ```
    pub fn parse_ingredients(&self) -> Result<Vec<Ingredient>> {
        let entries: Vec<&String> = self
            .ingredients
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .collect();

        if entries.is_empty() {
            return Err(LadleError::EmptyIngredientList);
        }

        entries.into_iter().map(|entry| parse_entry(entry)).collect()
    }
}

/// Splits one `"quantity,unit,description"` entry into an [`Ingredient`].
///
/// Fields are trimmed. An empty quantity field maps to `None`; anything else
/// must parse as a number.
fn parse_entry(entry: &str) -> Result<Ingredient> {
    let fields: Vec<&str> = entry.split(',').map(str::trim).collect();

    let [quantity, unit, description] = fields.as_slice() else {
        tracing::debug!(entry = %entry, field_count = fields.len(), "ingredient entry rejected");
        return Err(LadleError::MalformedIngredient(entry.to_string()));
    };

    let quantity = if quantity.is_empty() {
        None
    } else {
        let parsed = quantity
            .parse::<f64>()
            .map_err(|_| LadleError::MalformedIngredient(entry.to_string()))?;
        Some(parsed)
    };

    Ok(Ingredient {
        quantity,
        unit: (*unit).to_string(),
        description: (*description).to_string(),
    })
}
