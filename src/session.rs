//! Session runtime: owns the state, executes actions, drives the event loop.
//!
//! A [`Session`] wires the pure application core to its effectful
//! collaborators -- the remote data source, the durable store, the view
//! surfaces, and the navigable location. Events enter through
//! [`Session::dispatch`], which runs the handler and executes the returned
//! actions in order, feeding fetch completions back in as new events until
//! the queue drains. The session task is the single writer of application
//! state; nothing else ever mutates it.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

use crate::app::{handle_event, Action, AppState, DeferredEvent, Event};
use crate::remote::RecipeApi;
use crate::storage::{BookmarkFile, KeyValueStore};
use crate::views::SurfaceRegistry;
use crate::Config;

/// Store key under which the bookmark container is persisted.
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// Navigable location capability (the `#fragment` of a browser URL, or any
/// equivalent the host provides).
pub trait Location: Send {
    /// Returns the recipe id currently referenced by the location, if any.
    fn fragment(&self) -> Option<String>;

    /// Rewrites the location to reference `id` without triggering
    /// navigation.
    fn set_fragment(&mut self, id: &str);
}

/// In-memory location, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    fragment: Option<String>,
}

impl MemoryLocation {
    /// Creates a location with no referenced recipe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a location already referencing `id`.
    #[must_use]
    pub fn at(id: &str) -> Self {
        Self {
            fragment: Some(id.to_string()),
        }
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> Option<String> {
        self.fragment.clone()
    }

    fn set_fragment(&mut self, id: &str) {
        self.fragment = Some(id.to_string());
    }
}

/// A deferred event waiting for its deadline.
#[derive(Debug, Clone, Copy)]
struct ScheduledEntry {
    due: Instant,
    event: DeferredEvent,
}

/// The assembled application: state plus every effectful collaborator.
pub struct Session {
    config: Config,
    state: AppState,
    api: Box<dyn RecipeApi>,
    store: Box<dyn KeyValueStore>,
    surfaces: SurfaceRegistry,
    location: Box<dyn Location>,
    scheduled: Vec<ScheduledEntry>,
}

impl Session {
    /// Assembles a session and rehydrates persisted bookmarks.
    ///
    /// Corrupt or missing bookmark data degrades to an empty set; an
    /// unreadable store is logged and likewise treated as empty, so session
    /// construction itself never fails.
    pub fn new(
        config: Config,
        api: Box<dyn RecipeApi>,
        store: Box<dyn KeyValueStore>,
        surfaces: SurfaceRegistry,
        location: Box<dyn Location>,
    ) -> Self {
        let mut state = AppState::new(config.results_per_page);
        state.restore_bookmarks(Self::read_bookmarks(store.as_ref()));

        Self {
            config,
            state,
            api,
            store,
            surfaces,
            location,
            scheduled: Vec::new(),
        }
    }

    fn read_bookmarks(store: &dyn KeyValueStore) -> Vec<crate::domain::Recipe> {
        match store.get(BOOKMARKS_KEY) {
            Ok(Some(raw)) => BookmarkFile::decode(&raw),
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::warn!(error = %error, "bookmark store unreadable, starting empty");
                Vec::new()
            }
        }
    }

    /// Read-only view of the application state, for hosts and tests.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Runs the session-start sequence: renders the restored bookmarks and
    /// loads the recipe referenced by the location, if any.
    pub async fn start(&mut self) {
        let _span = tracing::debug_span!("session_start").entered();

        self.dispatch(Event::BookmarksRestored).await;

        if let Some(id) = self.location.fragment() {
            tracing::debug!(recipe_id = %id, "loading recipe from location");
            self.dispatch(Event::RecipeSelected { id }).await;
        }
    }

    /// Processes `event` to completion.
    ///
    /// Runs the handler, executes the returned actions in order, and feeds
    /// fetch completions back through the handler until no events remain.
    /// Fetches are awaited here, on the session task, so their completions
    /// are applied strictly one at a time.
    pub async fn dispatch(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            let actions = handle_event(&mut self.state, &self.config, &event);
            for action in actions {
                self.execute(action, &mut queue).await;
            }
        }
    }

    async fn execute(&mut self, action: Action, queue: &mut VecDeque<Event>) {
        match action {
            Action::FetchRecipe { request, id } => {
                let outcome = self
                    .api
                    .get_recipe(&id)
                    .await
                    .map_err(|e| e.to_string());
                queue.push_back(Event::RecipeFetched { request, outcome });
            }

            Action::FetchResults { request, query } => {
                let outcome = self
                    .api
                    .get_results(&query)
                    .await
                    .map_err(|e| e.to_string());
                queue.push_back(Event::ResultsFetched {
                    request,
                    query,
                    outcome,
                });
            }

            Action::SubmitRecipe { request, document } => {
                let outcome = self
                    .api
                    .post_recipe(&document)
                    .await
                    .map_err(|e| e.to_string());
                queue.push_back(Event::UploadFinished { request, outcome });
            }

            Action::Render { surface, data } => {
                if let Some(s) = self.surfaces.get_mut(surface) {
                    s.render(&data);
                }
            }

            Action::Update { surface, data } => {
                if let Some(s) = self.surfaces.get_mut(surface) {
                    s.update(&data);
                }
            }

            Action::RenderSpinner { surface } => {
                if let Some(s) = self.surfaces.get_mut(surface) {
                    s.render_spinner();
                }
            }

            Action::RenderError { surface, message } => {
                if let Some(s) = self.surfaces.get_mut(surface) {
                    s.render_error(&message);
                }
            }

            Action::CloseSurface { surface } => {
                if let Some(s) = self.surfaces.get_mut(surface) {
                    s.close();
                }
            }

            Action::PersistBookmarks { bookmarks } => {
                let raw = BookmarkFile::now(bookmarks).encode();
                // A failed write must not take the session down; the in-memory
                // set stays authoritative until the next successful persist.
                if let Err(error) = self.store.set(BOOKMARKS_KEY, &raw) {
                    tracing::error!(error = %error, "bookmark persistence failed");
                }
            }

            Action::SetLocation { id } => {
                self.location.set_fragment(&id);
            }

            Action::Schedule { delay, event } => {
                self.schedule(delay, event);
            }

            Action::ResetSession => {
                self.soft_reset(queue);
            }
        }
    }

    fn schedule(&mut self, delay: Duration, event: DeferredEvent) {
        tracing::debug!(delay = ?delay, event = ?event, "deferred event scheduled");
        self.scheduled.push(ScheduledEntry {
            due: Instant::now() + delay,
            event,
        });
    }

    /// Rebuilds the state from durable storage, keeping collaborators.
    ///
    /// Current recipe and search state are dropped; bookmarks are re-read
    /// from the store. The bookmark panel re-render is queued so it goes
    /// through the normal event path.
    fn soft_reset(&mut self, queue: &mut VecDeque<Event>) {
        tracing::debug!("soft session reset");
        self.state = AppState::new(self.config.results_per_page);
        self.state
            .restore_bookmarks(Self::read_bookmarks(self.store.as_ref()));
        queue.push_back(Event::BookmarksRestored);
    }

    /// Number of deferred events currently scheduled.
    #[must_use]
    pub fn scheduled_len(&self) -> usize {
        self.scheduled.len()
    }

    /// Cancels all scheduled deferred events.
    pub fn cancel_scheduled(&mut self) {
        if !self.scheduled.is_empty() {
            tracing::debug!(count = self.scheduled.len(), "scheduled events cancelled");
            self.scheduled.clear();
        }
    }

    /// Waits for each scheduled deferred event in deadline order and
    /// dispatches it. Returns once the schedule is empty.
    pub async fn run_scheduled(&mut self) {
        loop {
            let Some(next) = self
                .scheduled
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| e.due)
                .map(|(i, _)| i)
            else {
                return;
            };

            let entry = self.scheduled.swap_remove(next);
            tokio::time::sleep_until(entry.due).await;
            self.dispatch(Event::Deferred(entry.event)).await;
        }
    }

    /// Dispatches all scheduled deferred events immediately, ignoring their
    /// deadlines. Intended for headless hosts and tests.
    pub async fn flush_scheduled(&mut self) {
        let mut pending: Vec<_> = self.scheduled.drain(..).collect();
        pending.sort_by_key(|e| e.due);
        for entry in pending {
            self.dispatch(Event::Deferred(entry.event)).await;
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("surfaces", &self.surfaces)
            .field("scheduled", &self.scheduled.len())
            .finish_non_exhaustive()
    }
}
