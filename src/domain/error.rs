//! Error types for the ladle application core.
//!
//! This module defines the centralized error type [`LadleError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! The variants fall into two groups: user-facing operation failures
//! (`DataUnavailable`, `MalformedIngredient`, `EmptyIngredientList`,
//! `UploadRejected`, `InvalidServings`) whose messages are rendered on view
//! surfaces, and ambient failures (`Storage`, `Io`, `Config`) that surface
//! during persistence or startup.

use thiserror::Error;

/// The main error type for ladle operations.
///
/// This enum consolidates all error conditions that can occur while the
/// application core is running, from remote fetches to draft validation and
/// local persistence. Nothing here is fatal: every failure is caught at the
/// controller boundary, logged, and converted into an error render.
///
/// # Examples
///
/// ```
/// use ladle::domain::LadleError;
///
/// let err = LadleError::MalformedIngredient("bad-entry".to_string());
/// assert!(err.to_string().contains("bad-entry"));
/// ```
#[derive(Debug, Error)]
pub enum LadleError {
    /// Remote fetch or response normalization failed.
    ///
    /// Raised when the recipe or search endpoint cannot be reached, or when a
    /// response document is missing required fields. The string carries the
    /// underlying cause for logging and error rendering.
    #[error("We could not load that data. {0}")]
    DataUnavailable(String),

    /// A draft ingredient string did not split into exactly three fields.
    ///
    /// The payload names the offending entry verbatim so the user can correct
    /// it. Raised before any network write occurs.
    #[error("Wrong ingredient format: {0:?}. Please use 'quantity,unit,description'")]
    MalformedIngredient(String),

    /// A draft contained no ingredient entries after filtering empty ones.
    #[error("A recipe needs at least one ingredient")]
    EmptyIngredientList,

    /// The remote create endpoint rejected the draft.
    ///
    /// Wraps the transport or server-side cause as text that is shown on the
    /// submission surface.
    #[error("Recipe upload was rejected: {0}")]
    UploadRejected(String),

    /// Serving-size adjustment requested fewer than one serving.
    ///
    /// The recipe is left unchanged when this is raised.
    #[error("Servings must be at least 1, got {0}")]
    InvalidServings(u32),

    /// Durable key-value storage operation failed.
    ///
    /// Occurs when reading from or writing to the storage backend fails.
    /// The string contains a description of what went wrong.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    ///
    /// Occurs when required configuration values are missing or malformed.
    /// The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for ladle operations.
///
/// This is a type alias for `std::result::Result<T, LadleError>` that simplifies
/// function signatures throughout the codebase.
pub type Result<T> = std::result::Result<T, LadleError>;
