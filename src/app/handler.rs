//! Event handling and state transition logic.
//!
//! This module implements the controller: it processes UI-origin events and
//! load completions, mutates [`AppState`], and returns the action sequence
//! the session runtime must execute. It is pure with respect to I/O --
//! fetches, persistence, rendering, and timers all happen through the
//! returned [`Action`]s -- which is what makes the whole control flow
//! headless-testable.
//!
//! # Event flow
//!
//! ```text
//! UI event ──► handle_event ──► state mutations ──► Vec<Action> ──► runtime
//!                  ▲                                                  │
//!                  └────────────── load completions ◄─────────────────┘
//! ```
//!
//! # Error policy
//!
//! No failure escapes this layer: every operation failure is logged and
//! converted into a [`Action::RenderError`] on the relevant surface, so the
//! event loop keeps serving subsequent events. Load failures never leave
//! partially mutated state -- documents are normalized and validated before
//! any commit, and a failed recipe load clears the current recipe so stale
//! data is never shown.

use std::time::Duration;

use crate::app::actions::{Action, DeferredEvent, ViewData};
use crate::app::state::{AppState, RequestId};
use crate::domain::{LadleError, RecipeDraft};
use crate::remote::{DraftDocument, RecipeDocument, SearchHit};
use crate::views::SurfaceId;
use crate::Config;

/// Message rendered on the submission surface after a successful upload.
const UPLOAD_SUCCESS_MESSAGE: &str = "Recipe was successfully uploaded";

/// Events triggered by view collaborators, the navigable location, load
/// completions, or scheduled timers.
///
/// UI-origin variants are raised by the host's registered callbacks;
/// completion variants are fed back by the session runtime after it executes
/// a fetch action. Completions carry the [`RequestId`] of the fetch they
/// answer so superseded loads can be discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A recipe was selected (result click or location fragment change).
    RecipeSelected {
        /// Identifier of the recipe to open.
        id: String,
    },

    /// The search form was submitted.
    SearchSubmitted {
        /// Raw query text.
        query: String,
    },

    /// A pagination control requested another page.
    PageRequested {
        /// Requested 1-indexed page.
        page: usize,
    },

    /// The serving-size control changed the requested servings.
    ServingsAdjusted {
        /// Requested serving count.
        servings: u32,
    },

    /// The bookmark button on the current recipe was pressed.
    BookmarkToggled,

    /// The bookmarks panel asked for its initial render (session start).
    BookmarksRestored,

    /// The add-recipe form was submitted with a raw draft.
    RecipeSubmitted {
        /// Unvalidated draft from the form.
        draft: RecipeDraft,
    },

    /// A recipe fetch finished.
    RecipeFetched {
        /// Identifier of the fetch being answered.
        request: RequestId,
        /// The buffered wire document, or a failure description.
        outcome: Result<RecipeDocument, String>,
    },

    /// A search fetch finished.
    ResultsFetched {
        /// Identifier of the fetch being answered.
        request: RequestId,
        /// The query the fetch was issued for; committed only on success.
        query: String,
        /// The buffered hits, or a failure description.
        outcome: Result<Vec<SearchHit>, String>,
    },

    /// An upload finished.
    UploadFinished {
        /// Identifier of the upload being answered.
        request: RequestId,
        /// The created recipe document (with assigned id), or a failure.
        outcome: Result<RecipeDocument, String>,
    },

    /// A scheduled timer fired.
    Deferred(DeferredEvent),
}

/// Processes an event, mutates application state, and returns the actions to
/// execute.
///
/// Infallible by design: domain failures are converted into error renders
/// here, at the controller boundary, rather than propagated (see the module
/// docs for the policy). An empty vector means the event required no side
/// effects.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, config: &Config, event: &Event) -> Vec<Action> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event_name(event)).entered();

    match event {
        Event::RecipeSelected { id } => {
            if id.is_empty() {
                tracing::debug!("empty recipe id, nothing to load");
                return vec![];
            }

            let mut actions = vec![];

            // Re-patch the visible result page first so the active selection
            // highlight tracks the navigation.
            if !state.search.results.is_empty() {
                actions.push(Action::Update {
                    surface: SurfaceId::Results,
                    data: ViewData::Results(state.search_results_page(None)),
                });
            }

            actions.push(Action::RenderSpinner {
                surface: SurfaceId::Recipe,
            });

            let request = state.begin_recipe_load();
            tracing::debug!(recipe_id = %id, request = ?request, "recipe load issued");
            actions.push(Action::FetchRecipe {
                request,
                id: id.clone(),
            });

            actions
        }

        Event::RecipeFetched { request, outcome } => {
            if !state.is_current_recipe_load(*request) {
                tracing::debug!(request = ?request, "stale recipe load ignored");
                return vec![];
            }

            let normalized = outcome
                .clone()
                .and_then(|document| document.into_recipe(false));

            match normalized {
                Ok(mut recipe) => {
                    recipe.bookmarked = state.bookmarks.contains(&recipe.id);
                    state.install_recipe(recipe.clone());
                    vec![
                        Action::Render {
                            surface: SurfaceId::Recipe,
                            data: ViewData::Recipe(recipe),
                        },
                        Action::Update {
                            surface: SurfaceId::Bookmarks,
                            data: ViewData::Bookmarks(state.bookmarks.entries().to_vec()),
                        },
                    ]
                }
                Err(cause) => {
                    let error = LadleError::DataUnavailable(cause);
                    tracing::error!(error = %error, "recipe load failed");
                    // Clear rather than keep: stale data must never be shown
                    // as current.
                    state.clear_recipe();
                    vec![Action::RenderError {
                        surface: SurfaceId::Recipe,
                        message: error.to_string(),
                    }]
                }
            }
        }

        Event::SearchSubmitted { query } => {
            let query = query.trim();
            if query.is_empty() {
                tracing::debug!("empty query, search skipped");
                return vec![];
            }

            let request = state.begin_search_load();
            tracing::debug!(query = %query, request = ?request, "search load issued");
            vec![
                Action::RenderSpinner {
                    surface: SurfaceId::Results,
                },
                Action::FetchResults {
                    request,
                    query: query.to_string(),
                },
            ]
        }

        Event::ResultsFetched {
            request,
            query,
            outcome,
        } => {
            if !state.is_current_search_load(*request) {
                tracing::debug!(request = ?request, "stale search load ignored");
                return vec![];
            }

            match outcome {
                Ok(hits) => {
                    let results = hits.iter().cloned().map(SearchHit::into_result).collect();
                    state.replace_search(query.clone(), results);
                    vec![
                        Action::Render {
                            surface: SurfaceId::Results,
                            data: ViewData::Results(state.search_results_page(None)),
                        },
                        Action::Render {
                            surface: SurfaceId::Pagination,
                            data: ViewData::Pagination {
                                page: state.search.page,
                                page_count: state.search.page_count(),
                            },
                        },
                    ]
                }
                Err(cause) => {
                    // The query is not committed; prior results stay valid.
                    let error = LadleError::DataUnavailable(cause.clone());
                    tracing::error!(error = %error, query = %query, "search load failed");
                    vec![Action::RenderError {
                        surface: SurfaceId::Results,
                        message: error.to_string(),
                    }]
                }
            }
        }

        Event::PageRequested { page } => {
            let slice = state.search_results_page(Some(*page));
            tracing::debug!(page = page, visible = slice.len(), "page requested");
            vec![
                Action::Render {
                    surface: SurfaceId::Results,
                    data: ViewData::Results(slice),
                },
                Action::Render {
                    surface: SurfaceId::Pagination,
                    data: ViewData::Pagination {
                        page: state.search.page,
                        page_count: state.search.page_count(),
                    },
                },
            ]
        }

        Event::ServingsAdjusted { servings } => match state.update_servings(*servings) {
            Ok(()) => match &state.recipe {
                Some(recipe) => vec![Action::Update {
                    surface: SurfaceId::Recipe,
                    data: ViewData::Recipe(recipe.clone()),
                }],
                None => vec![],
            },
            Err(error) => {
                tracing::warn!(error = %error, "servings adjustment rejected");
                vec![Action::RenderError {
                    surface: SurfaceId::Recipe,
                    message: error.to_string(),
                }]
            }
        },

        Event::BookmarkToggled => {
            let Some(recipe) = state.recipe.clone() else {
                tracing::debug!("no current recipe, bookmark toggle ignored");
                return vec![];
            };

            if recipe.bookmarked {
                state.delete_bookmark(&recipe.id);
            } else {
                state.add_bookmark();
            }

            let Some(current) = state.recipe.clone() else {
                return vec![];
            };
            vec![
                Action::Render {
                    surface: SurfaceId::Bookmarks,
                    data: ViewData::Bookmarks(state.bookmarks.entries().to_vec()),
                },
                Action::Update {
                    surface: SurfaceId::Recipe,
                    data: ViewData::Recipe(current),
                },
                Action::PersistBookmarks {
                    bookmarks: state.bookmarks.entries().to_vec(),
                },
            ]
        }

        Event::BookmarksRestored => vec![Action::Render {
            surface: SurfaceId::Bookmarks,
            data: ViewData::Bookmarks(state.bookmarks.entries().to_vec()),
        }],

        Event::RecipeSubmitted { draft } => match draft.parse_ingredients() {
            Ok(ingredients) => {
                let request = state.begin_upload();
                tracing::debug!(title = %draft.title, request = ?request, "upload issued");
                vec![
                    Action::RenderSpinner {
                        surface: SurfaceId::AddRecipe,
                    },
                    Action::SubmitRecipe {
                        request,
                        document: DraftDocument {
                            title: draft.title.clone(),
                            source_url: draft.source_url.clone(),
                            image_url: draft.image_url.clone(),
                            publisher: draft.publisher.clone(),
                            cooking_time: draft.cooking_minutes,
                            servings: draft.servings,
                            ingredients,
                        },
                    },
                ]
            }
            Err(error) => {
                tracing::warn!(error = %error, "draft validation failed");
                vec![Action::RenderError {
                    surface: SurfaceId::AddRecipe,
                    message: error.to_string(),
                }]
            }
        },

        Event::UploadFinished { request, outcome } => {
            if !state.is_current_upload(*request) {
                tracing::debug!(request = ?request, "stale upload completion ignored");
                return vec![];
            }

            let normalized = outcome
                .clone()
                .and_then(|document| document.into_recipe(false));

            match normalized {
                Ok(mut recipe) => {
                    let id = recipe.id.clone();
                    recipe.bookmarked = state.bookmarks.contains(&id);
                    state.install_recipe(recipe.clone());
                    let delay = Duration::from_secs_f64(config.modal_close_secs.max(0.0));
                    vec![
                        Action::Render {
                            surface: SurfaceId::Recipe,
                            data: ViewData::Recipe(recipe),
                        },
                        Action::Render {
                            surface: SurfaceId::AddRecipe,
                            data: ViewData::Message(UPLOAD_SUCCESS_MESSAGE.to_string()),
                        },
                        Action::Render {
                            surface: SurfaceId::Bookmarks,
                            data: ViewData::Bookmarks(state.bookmarks.entries().to_vec()),
                        },
                        Action::SetLocation { id },
                        Action::Schedule {
                            delay,
                            event: DeferredEvent::CloseSubmissionWindow,
                        },
                        // Soft reset so uploaded state is reflected in a clean
                        // reload. Scheduled on success only: an error render
                        // must never be destroyed by this timer.
                        Action::Schedule {
                            delay,
                            event: DeferredEvent::ReloadSession,
                        },
                    ]
                }
                Err(cause) => {
                    let error = LadleError::UploadRejected(cause);
                    tracing::error!(error = %error, "upload failed");
                    vec![Action::RenderError {
                        surface: SurfaceId::AddRecipe,
                        message: error.to_string(),
                    }]
                }
            }
        }

        Event::Deferred(DeferredEvent::CloseSubmissionWindow) => vec![Action::CloseSurface {
            surface: SurfaceId::AddRecipe,
        }],

        Event::Deferred(DeferredEvent::ReloadSession) => vec![Action::ResetSession],
    }
}

/// Short name of an event for span fields.
fn event_name(event: &Event) -> &'static str {
    match event {
        Event::RecipeSelected { .. } => "RecipeSelected",
        Event::SearchSubmitted { .. } => "SearchSubmitted",
        Event::PageRequested { .. } => "PageRequested",
        Event::ServingsAdjusted { .. } => "ServingsAdjusted",
        Event::BookmarkToggled => "BookmarkToggled",
        Event::BookmarksRestored => "BookmarksRestored",
        Event::RecipeSubmitted { .. } => "RecipeSubmitted",
        Event::RecipeFetched { .. } => "RecipeFetched",
        Event::ResultsFetched { .. } => "ResultsFetched",
        Event::UploadFinished { .. } => "UploadFinished",
        Event::Deferred(_) => "Deferred",
    }
}
