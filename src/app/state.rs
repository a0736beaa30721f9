//! Application state container and derived-state maintenance.
//!
//! This module defines [`AppState`], the single aggregate holding the current
//! recipe, the search state, and the bookmark set, together with the
//! pagination math and the request-identifier bookkeeping that implements the
//! stale-load-supersession policy.
//!
//! # State components
//!
//! - **Current recipe**: the full detail record being viewed, or `None`
//! - **Search state**: committed query, relevance-ordered results, 1-indexed
//!   current page, results-per-page constant
//! - **Bookmark set**: insertion-ordered, id-unique set of full recipe
//!   snapshots
//! - **Request counters**: monotonically increasing identifiers per load
//!   kind, used to discard completions of superseded fetches
//!
//! # Mutation discipline
//!
//! All mutation happens synchronously through the methods below, called from
//! the event handler. Loads buffer and validate their data fully before any
//! of these methods run, so no partially-applied state is ever observable.

use crate::domain::{Recipe, Result, SearchResult};

/// Identifier for one issued asynchronous load.
///
/// Identifiers increase monotonically per [`AppState`]; a completion carrying
/// anything but the latest issued identifier for its load kind is stale and
/// must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(pub u64);

/// Search query state: committed query, results, and pagination.
///
/// Replaced wholesale when a query succeeds; a failed query never commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    /// The committed query string, empty before the first successful search.
    pub query: String,

    /// Result summaries in the relevance order reported by the source.
    pub results: Vec<SearchResult>,

    /// Current page, 1-indexed. Reset to 1 on every committed query.
    pub page: usize,

    /// Results per page. Positive; fixed at construction from configuration.
    pub per_page: usize,
}

impl SearchState {
    /// Creates an empty search state with the given page size.
    #[must_use]
    pub fn new(per_page: usize) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            page: 1,
            per_page,
        }
    }

    /// Number of pages needed to show all results.
    ///
    /// Zero when there are no results.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.results.len().div_ceil(self.per_page)
    }

    /// Returns the sub-sequence of results for `page`, preserving relevance
    /// order.
    ///
    /// Pages are 1-indexed; any page outside `[1, page_count()]` yields an
    /// empty slice, which is a valid, non-error result. No clamping is
    /// performed.
    #[must_use]
    pub fn page_slice(&self, page: usize) -> &[SearchResult] {
        if page == 0 {
            return &[];
        }
        let Some(start) = (page - 1).checked_mul(self.per_page) else {
            return &[];
        };
        if start >= self.results.len() {
            return &[];
        }
        let end = (start + self.per_page).min(self.results.len());
        &self.results[start..end]
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Durable, insertion-ordered set of bookmarked recipes, keyed by id.
///
/// Members are full recipe snapshots, never search summaries. Adding an
/// already-present id replaces the snapshot in place; removal of an absent id
/// is a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkSet {
    entries: Vec<Recipe>,
}

impl BookmarkSet {
    /// Rebuilds a set from persisted entries, dropping duplicate ids (first
    /// occurrence wins) and forcing the derived flag on each snapshot.
    #[must_use]
    pub fn from_entries(entries: Vec<Recipe>) -> Self {
        let mut set = Self::default();
        for mut recipe in entries {
            recipe.bookmarked = true;
            if !set.contains(&recipe.id) {
                set.entries.push(recipe);
            }
        }
        set
    }

    /// Inserts `recipe` keyed by id. If the id is already present the stored
    /// snapshot is replaced in place; otherwise the recipe is appended.
    pub fn insert(&mut self, mut recipe: Recipe) {
        recipe.bookmarked = true;
        if let Some(existing) = self.entries.iter_mut().find(|r| r.id == recipe.id) {
            *existing = recipe;
        } else {
            self.entries.push(recipe);
        }
    }

    /// Removes the entry with `id` if present. Absence is not an error.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.id != id);
        self.entries.len() != before
    }

    /// Membership test by id.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|r| r.id == id)
    }

    /// Bookmarked recipes in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Recipe] {
        &self.entries
    }

    /// Number of bookmarked recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Central application state aggregate.
///
/// Constructed once at session start with an empty recipe and search state;
/// bookmarks are rehydrated from durable storage by the session. Never torn
/// down -- it lives for the whole session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// The recipe currently being viewed, if any.
    pub recipe: Option<Recipe>,

    /// Current search query, results, and pagination.
    pub search: SearchState,

    /// Bookmarked recipes.
    pub bookmarks: BookmarkSet,

    /// Monotonic counter backing issued request identifiers.
    next_request: u64,

    /// Latest issued recipe-load request, if any load was ever issued.
    current_recipe_request: Option<RequestId>,

    /// Latest issued search-load request.
    current_search_request: Option<RequestId>,

    /// Latest issued upload request.
    current_upload_request: Option<RequestId>,
}

impl AppState {
    /// Creates a fresh state with empty recipe and search and the configured
    /// page size. Bookmarks start empty; use [`restore_bookmarks`] to
    /// rehydrate persisted ones.
    ///
    /// [`restore_bookmarks`]: Self::restore_bookmarks
    #[must_use]
    pub fn new(per_page: usize) -> Self {
        Self {
            search: SearchState::new(per_page),
            ..Self::default()
        }
    }

    /// Replaces the bookmark set with rehydrated entries.
    pub fn restore_bookmarks(&mut self, entries: Vec<Recipe>) {
        self.bookmarks = BookmarkSet::from_entries(entries);
        tracing::debug!(count = self.bookmarks.len(), "bookmarks restored");
    }

    /// Issues a fresh recipe-load request identifier, superseding any load
    /// still in flight.
    pub fn begin_recipe_load(&mut self) -> RequestId {
        let id = self.next_id();
        self.current_recipe_request = Some(id);
        id
    }

    /// Issues a fresh search-load request identifier.
    pub fn begin_search_load(&mut self) -> RequestId {
        let id = self.next_id();
        self.current_search_request = Some(id);
        id
    }

    /// Issues a fresh upload request identifier.
    pub fn begin_upload(&mut self) -> RequestId {
        let id = self.next_id();
        self.current_upload_request = Some(id);
        id
    }

    /// Whether `request` is the latest issued recipe load.
    #[must_use]
    pub fn is_current_recipe_load(&self, request: RequestId) -> bool {
        self.current_recipe_request == Some(request)
    }

    /// Whether `request` is the latest issued search load.
    #[must_use]
    pub fn is_current_search_load(&self, request: RequestId) -> bool {
        self.current_search_request == Some(request)
    }

    /// Whether `request` is the latest issued upload.
    #[must_use]
    pub fn is_current_upload(&self, request: RequestId) -> bool {
        self.current_upload_request == Some(request)
    }

    fn next_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    /// Installs `recipe` as current, deriving its `bookmarked` flag from the
    /// bookmark set.
    pub fn install_recipe(&mut self, mut recipe: Recipe) {
        recipe.bookmarked = self.bookmarks.contains(&recipe.id);
        tracing::debug!(recipe_id = %recipe.id, bookmarked = recipe.bookmarked, "recipe installed");
        self.recipe = Some(recipe);
    }

    /// Clears the current recipe.
    ///
    /// Applied on load failure so stale data is never shown as current.
    pub fn clear_recipe(&mut self) {
        self.recipe = None;
    }

    /// Commits a successful search: new query, new results, page reset to 1.
    pub fn replace_search(&mut self, query: String, results: Vec<SearchResult>) {
        tracing::debug!(query = %query, result_count = results.len(), "search state replaced");
        self.search.query = query;
        self.search.results = results;
        self.search.page = 1;
    }

    /// Records `page` (or keeps the current page when `None`) and returns
    /// that page's results.
    ///
    /// The only mutation is the recorded page number, kept for subsequent
    /// pagination-control rendering. Out-of-range pages return an empty
    /// vector.
    pub fn search_results_page(&mut self, page: Option<usize>) -> Vec<SearchResult> {
        let page = page.unwrap_or(self.search.page);
        self.search.page = page;
        self.search.page_slice(page).to_vec()
    }

    /// Bookmarks the current recipe.
    ///
    /// Inserts a snapshot into the set (replacement if already present) and
    /// sets the current recipe's derived flag. No-op if nothing is loaded.
    pub fn add_bookmark(&mut self) {
        let Some(recipe) = self.recipe.as_mut() else {
            return;
        };
        recipe.bookmarked = true;
        let snapshot = recipe.clone();
        tracing::debug!(recipe_id = %snapshot.id, "bookmark added");
        self.bookmarks.insert(snapshot);
    }

    /// Removes `id` from the bookmark set, clearing the current recipe's
    /// derived flag when the ids match.
    pub fn delete_bookmark(&mut self, id: &str) {
        self.bookmarks.remove(id);
        if let Some(recipe) = self.recipe.as_mut() {
            if recipe.id == id {
                recipe.bookmarked = false;
            }
        }
        tracing::debug!(recipe_id = %id, "bookmark deleted");
    }

    /// Rescales the current recipe to `servings`.
    ///
    /// No-op if nothing is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::LadleError::InvalidServings`] for a zero
    /// serving count; the recipe is left unchanged.
    pub fn update_servings(&mut self, servings: u32) -> Result<()> {
        match self.recipe.as_mut() {
            Some(recipe) => recipe.update_servings(servings),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Recipe;

    fn result(id: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            title: format!("Recipe {id}"),
            publisher: "pub".to_string(),
            image_url: String::new(),
        }
    }

    fn recipe(id: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: format!("Recipe {id}"),
            publisher: "pub".to_string(),
            source_url: String::new(),
            image_url: String::new(),
            cooking_minutes: 10,
            servings: 2,
            ingredients: vec![],
            key: None,
            bookmarked: false,
        }
    }

    fn thirty_results() -> Vec<SearchResult> {
        (0..30).map(|i| result(&format!("r{i}"))).collect()
    }

    #[test]
    fn first_page_holds_the_first_per_page_results_in_order() {
        let mut state = AppState::new(10);
        state.replace_search("pizza".to_string(), thirty_results());

        let page = state.search_results_page(Some(1));
        assert_eq!(page.len(), 10);
        assert_eq!(page[0].id, "r0");
        assert_eq!(page[9].id, "r9");
    }

    #[test]
    fn page_three_of_thirty_returns_results_twenty_to_thirty() {
        let mut state = AppState::new(10);
        state.replace_search("pizza".to_string(), thirty_results());

        let page = state.search_results_page(Some(3));
        assert_eq!(page.len(), 10);
        assert_eq!(page[0].id, "r20");
        assert_eq!(page[9].id, "r29");
    }

    #[test]
    fn out_of_range_pages_are_empty_not_errors() {
        let mut state = AppState::new(10);
        state.replace_search("pizza".to_string(), thirty_results());

        assert!(state.search_results_page(Some(4)).is_empty());
        assert!(state.search_results_page(Some(0)).is_empty());
        assert!(state.search_results_page(Some(1_000_000)).is_empty());
    }

    #[test]
    fn requesting_a_page_records_it_for_pagination_rendering() {
        let mut state = AppState::new(10);
        state.replace_search("pizza".to_string(), thirty_results());

        state.search_results_page(Some(2));
        assert_eq!(state.search.page, 2);

        // Default argument keeps the recorded page.
        let page = state.search_results_page(None);
        assert_eq!(page[0].id, "r10");
    }

    #[test]
    fn new_query_resets_page_to_one() {
        let mut state = AppState::new(10);
        state.replace_search("pizza".to_string(), thirty_results());
        state.search_results_page(Some(3));

        state.replace_search("pasta".to_string(), thirty_results());
        assert_eq!(state.search.page, 1);
    }

    #[test]
    fn page_count_rounds_up() {
        let mut search = SearchState::new(10);
        search.results = (0..25).map(|i| result(&format!("r{i}"))).collect();
        assert_eq!(search.page_count(), 3);

        search.results.clear();
        assert_eq!(search.page_count(), 0);
    }

    #[test]
    fn adding_a_bookmark_twice_keeps_one_entry() {
        let mut state = AppState::new(10);
        state.install_recipe(recipe("a"));

        state.add_bookmark();
        state.add_bookmark();

        assert_eq!(state.bookmarks.len(), 1);
        assert!(state.recipe.as_ref().unwrap().bookmarked);
    }

    #[test]
    fn add_then_delete_restores_membership() {
        let mut state = AppState::new(10);
        state.install_recipe(recipe("a"));

        let before: Vec<String> = state.bookmarks.entries().iter().map(|r| r.id.clone()).collect();
        state.add_bookmark();
        state.delete_bookmark("a");
        let after: Vec<String> = state.bookmarks.entries().iter().map(|r| r.id.clone()).collect();

        assert_eq!(before, after);
        assert!(!state.recipe.as_ref().unwrap().bookmarked);
    }

    #[test]
    fn deleting_an_absent_bookmark_is_a_noop() {
        let mut state = AppState::new(10);
        state.delete_bookmark("missing");
        assert!(state.bookmarks.is_empty());
    }

    #[test]
    fn installed_recipe_derives_bookmarked_from_set() {
        let mut state = AppState::new(10);
        state.install_recipe(recipe("a"));
        state.add_bookmark();

        // Reload of the same recipe picks the flag up from the set.
        state.install_recipe(recipe("a"));
        assert!(state.recipe.as_ref().unwrap().bookmarked);

        state.install_recipe(recipe("b"));
        assert!(!state.recipe.as_ref().unwrap().bookmarked);
    }

    #[test]
    fn rehydration_drops_duplicate_ids_and_forces_flag() {
        let entries = vec![recipe("a"), recipe("b"), recipe("a")];
        let set = BookmarkSet::from_entries(entries);

        assert_eq!(set.len(), 2);
        assert!(set.entries().iter().all(|r| r.bookmarked));
    }

    #[test]
    fn newer_request_supersedes_older() {
        let mut state = AppState::new(10);
        let first = state.begin_recipe_load();
        let second = state.begin_recipe_load();

        assert!(!state.is_current_recipe_load(first));
        assert!(state.is_current_recipe_load(second));
    }

    #[test]
    fn request_kinds_are_tracked_independently() {
        let mut state = AppState::new(10);
        let recipe_req = state.begin_recipe_load();
        let search_req = state.begin_search_load();

        assert!(state.is_current_recipe_load(recipe_req));
        assert!(state.is_current_search_load(search_req));
        assert!(!state.is_current_upload(recipe_req));
    }

    #[test]
    fn update_servings_without_recipe_is_a_noop() {
        let mut state = AppState::new(10);
        assert!(state.update_servings(4).is_ok());
    }
}
