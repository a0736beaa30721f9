//! Actions representing side effects to be executed by the session runtime.
//!
//! This module defines the [`Action`] type, the imperative commands produced
//! by the event handler after processing an event. Actions are the boundary
//! between pure state transitions and effectful operations: network fetches,
//! render calls on view surfaces, durable persistence, location updates, and
//! scheduled deferred work.
//!
//! The handler returns a `Vec<Action>` per event; the session runtime
//! executes them in order, feeding fetch completions back in as new events.

use std::time::Duration;

use crate::app::state::RequestId;
use crate::domain::{Recipe, SearchResult};
use crate::remote::DraftDocument;
use crate::views::SurfaceId;

/// State slice handed to a view surface with a render or update call.
///
/// Slices are owned snapshots: surfaces must stay valid even if the state
/// mutates before they repaint.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData {
    /// Full recipe detail.
    Recipe(Recipe),

    /// One page of search results, in relevance order.
    Results(Vec<SearchResult>),

    /// Pagination control state.
    Pagination {
        /// Current 1-indexed page.
        page: usize,
        /// Total page count.
        page_count: usize,
    },

    /// The full bookmark list, in insertion order.
    Bookmarks(Vec<Recipe>),

    /// A plain message (submission success text).
    Message(String),
}

/// Deferred work fired by a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredEvent {
    /// Close the add-recipe submission window.
    CloseSubmissionWindow,

    /// Soft-reset the session so uploaded state is reflected in a clean
    /// reload state.
    ReloadSession,
}

/// Commands emitted by the event handler for the session runtime to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fetch the full recipe document for `id`.
    ///
    /// The completion must be fed back as
    /// [`Event::RecipeFetched`](crate::app::Event::RecipeFetched) carrying the
    /// same `request`.
    FetchRecipe {
        /// Identifier guarding against stale completions.
        request: RequestId,
        /// Recipe identifier to fetch.
        id: String,
    },

    /// Fetch search hits for `query`.
    FetchResults {
        /// Identifier guarding against stale completions.
        request: RequestId,
        /// Query string to search for.
        query: String,
    },

    /// Submit a validated draft document to the create endpoint.
    SubmitRecipe {
        /// Identifier guarding against stale completions.
        request: RequestId,
        /// Parsed draft ready for the wire.
        document: DraftDocument,
    },

    /// Draw `surface` from scratch with `data`.
    Render {
        /// Target surface.
        surface: SurfaceId,
        /// State slice to draw.
        data: ViewData,
    },

    /// Patch `surface` in place with `data`.
    Update {
        /// Target surface.
        surface: SurfaceId,
        /// State slice to patch in.
        data: ViewData,
    },

    /// Show a loading indicator on `surface`.
    RenderSpinner {
        /// Target surface.
        surface: SurfaceId,
    },

    /// Show an error indicator with a user-visible message.
    RenderError {
        /// Target surface.
        surface: SurfaceId,
        /// Message text shown to the user.
        message: String,
    },

    /// Close `surface` (submission window dismissal).
    CloseSurface {
        /// Target surface.
        surface: SurfaceId,
    },

    /// Persist the full bookmark set to durable storage.
    PersistBookmarks {
        /// Snapshot of the set, in insertion order.
        bookmarks: Vec<Recipe>,
    },

    /// Rewrite the navigable location fragment to reference a recipe.
    SetLocation {
        /// Recipe identifier to reference.
        id: String,
    },

    /// Schedule `event` to fire after `delay`.
    Schedule {
        /// Delay before firing.
        delay: Duration,
        /// Deferred work to run.
        event: DeferredEvent,
    },

    /// Rebuild the session state from durable storage (soft reset).
    ResetSession,
}
