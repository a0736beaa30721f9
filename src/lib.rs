//! Ladle: an embeddable application core for a recipe lookup app.
//!
//! Ladle is the headless heart of a recipe search-and-bookmark application:
//! - Single state store for the current recipe, search results, and bookmarks
//! - Pure event handler turning UI events into explicit side-effect actions
//! - Asynchronous recipe loading with stale-completion supersession
//! - Durable bookmark persistence backed by atomic JSON file storage
//! - Pluggable view surfaces, remote API, store, and location collaborators
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host Shim (main.rs or an embedding application)    │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Session Runtime (session.rs)                       │  ← Event loop
//! │  - Action execution                                 │  ← Collaborator
//! │  - Deferred scheduling                              │    wiring
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │  ← Business logic
//! │  - Action production                                │
//! │  - Pagination and supersession bookkeeping          │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ View Layer    │   │ Storage Layer │   │ Remote Layer  │
//! │ (views.rs)    │   │ (storage/)    │   │ (remote/)     │
//! │ - Surfaces    │   │ - JSON I/O    │   │ - HTTP client │
//! │ - Registry    │   │ - Versioning  │   │ - Wire docs   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Recipe, ingredient, search result models         │
//! │  - Draft parsing and validation                     │
//! │  - Error types (domain/error)                       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Core domain types (Recipe, drafts, errors)
//! - [`remote`]: Remote data-source capability and HTTP backend
//! - [`storage`]: JSON file persistence for the bookmark set
//! - [`session`]: Session runtime executing actions and deferred work
//! - [`views`]: View surface capability trait and registry
//! - [`observability`]: Tracing subscriber setup
//!
//! # Event Flow
//!
//! 1. **Session start** ([`session::Session::start`]):
//!    - Rehydrate bookmarks from durable storage
//!    - Render the bookmark panel
//!    - Load the recipe referenced by the location, if any
//!
//! 2. **UI event**:
//!    - The host raises an [`Event`] via [`session::Session::dispatch`]
//!    - [`handle_event`] mutates state and returns [`Action`]s
//!    - The runtime executes the actions in order
//!
//! 3. **Load completion**:
//!    - Fetches resolve into completion events carrying their request id
//!    - Completions of superseded loads are discarded
//!    - Committed data is rendered onto the relevant surfaces
//!
//! # Examples
//!
//! ## Basic Usage (Library)
//!
//! ```rust
//! use ladle::{handle_event, AppState, Config, Event};
//!
//! let config = Config::default();
//! let mut state = AppState::new(config.results_per_page);
//!
//! // A search submission produces a spinner render plus a fetch action.
//! let actions = handle_event(&mut state, &config, &Event::SearchSubmitted {
//!     query: "pizza".to_string(),
//! });
//! assert_eq!(actions.len(), 2);
//! ```
//!
//! # Key Design Decisions
//!
//! ## Single-Writer State
//!
//! All state mutation happens synchronously inside [`handle_event`] on the
//! session task. Loads buffer their data fully before the commit event is
//! handled, so no await point ever exposes partially-applied state.
//!
//! ## Stale-Load Supersession
//!
//! Every load is issued under a monotonically increasing request id; only
//! the latest id per load kind may commit. Overlapping navigations resolve
//! to the most recently requested recipe regardless of network ordering.
//!
//! ## Actions over Callbacks
//!
//! The handler never touches a collaborator directly. Side effects travel
//! out as [`Action`] values, which keeps the whole control flow observable
//! and headless-testable.

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod observability;
pub mod remote;
pub mod session;
pub mod storage;
pub mod views;

pub use app::{handle_event, Action, AppState, DeferredEvent, Event, RequestId, ViewData};
pub use domain::{LadleError, Recipe, RecipeDraft, Result, SearchResult};
pub use session::{Location, MemoryLocation, Session};
pub use views::{Surface, SurfaceId, SurfaceRegistry};

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

/// Application configuration.
///
/// Hosts may build this directly, parse it from a string map (embedding
/// environments that pass options as key-value pairs), or load it from a
/// TOML file.
///
/// # Example
///
/// ```toml
/// # ~/.config/ladle/config.toml
/// api_url = "https://forkify-api.herokuapp.com/api/v2"
/// api_key = "your-key"
/// results_per_page = 10
/// modal_close_secs = 2.5
/// trace_level = "info"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the remote recipe service.
    pub api_url: String,

    /// Write-access credential appended to API requests. Optional; fetches
    /// work without one, uploads require one on most deployments.
    pub api_key: Option<String>,

    /// Search results shown per page. Must be positive. Default: 10
    pub results_per_page: usize,

    /// Seconds before the submission window auto-closes after a successful
    /// upload. Default: 2.5
    pub modal_close_secs: f64,

    /// Tracing level for the log subscriber.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://forkify-api.herokuapp.com/api/v2".to_string(),
            api_key: None,
            results_per_page: 10,
            modal_close_secs: 2.5,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string map.
    ///
    /// Embedding environments often hand options over as a
    /// `BTreeMap<String, String>`; this extracts and parses typed values
    /// with fallback defaults.
    ///
    /// # Parsing Rules
    ///
    /// - `api_url`: String (falls back to the public endpoint)
    /// - `api_key`: String → `Option<String>`
    /// - `results_per_page`: String → `usize` (falls back to 10 on parse
    ///   error or zero)
    /// - `modal_close_secs`: String → `f64` (falls back to 2.5)
    /// - `trace_level`: String → `Option<String>`
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use ladle::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("results_per_page".to_string(), "25".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.results_per_page, 25);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let results_per_page = map
            .get("results_per_page")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.results_per_page);

        let modal_close_secs = map
            .get("modal_close_secs")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|s| *s >= 0.0)
            .unwrap_or(defaults.modal_close_secs);

        Self {
            api_url: map.get("api_url").cloned().unwrap_or(defaults.api_url),
            api_key: map.get("api_key").cloned(),
            results_per_page,
            modal_close_secs,
            trace_level: map.get("trace_level").cloned(),
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| LadleError::Config(format!("invalid config file: {e}")))?;
        if config.results_per_page == 0 {
            return Err(LadleError::Config(
                "results_per_page must be positive".to_string(),
            ));
        }
        if config.modal_close_secs < 0.0 {
            return Err(LadleError::Config(
                "modal_close_secs must not be negative".to_string(),
            ));
        }
        Ok(config)
    }
}
