//! End-to-end session flows against in-memory collaborators.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ladle::domain::{Ingredient, RecipeDraft, Result};
use ladle::remote::{ApiError, DraftDocument, RecipeApi, RecipeDocument, SearchHit};
use ladle::storage::KeyValueStore;
use ladle::{
    Config, Event, MemoryLocation, Session, Surface, SurfaceId, SurfaceRegistry, ViewData,
};

/// Fixed fixture service backing the mock API.
struct FixtureApi {
    recipes: HashMap<String, RecipeDocument>,
    hits: Vec<SearchHit>,
    /// Query for which `get_results` reports a transport failure.
    fail_query: Option<String>,
}

impl FixtureApi {
    fn new(count: usize) -> Self {
        let mut recipes = HashMap::new();
        let mut hits = Vec::new();
        for i in 0..count {
            let id = format!("r{i}");
            recipes.insert(id.clone(), document(&id));
            hits.push(SearchHit {
                id,
                title: format!("Recipe {i}"),
                publisher: "Test Kitchen".to_string(),
                image_url: String::new(),
            });
        }
        Self {
            recipes,
            hits,
            fail_query: None,
        }
    }
}

fn document(id: &str) -> RecipeDocument {
    RecipeDocument {
        id: id.to_string(),
        title: format!("Recipe {id}"),
        publisher: "Test Kitchen".to_string(),
        source_url: "https://example.com".to_string(),
        image_url: "https://example.com/i.jpg".to_string(),
        servings: 4,
        cooking_time: 30,
        ingredients: vec![Ingredient {
            quantity: Some(2.0),
            unit: "cups".to_string(),
            description: "flour".to_string(),
        }],
        key: None,
    }
}

#[async_trait]
impl RecipeApi for FixtureApi {
    async fn get_recipe(&self, id: &str) -> std::result::Result<RecipeDocument, ApiError> {
        self.recipes.get(id).cloned().ok_or(ApiError::Status {
            status: 404,
            message: format!("No recipe found with id {id}"),
        })
    }

    async fn get_results(&self, query: &str) -> std::result::Result<Vec<SearchHit>, ApiError> {
        if self.fail_query.as_deref() == Some(query) {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        Ok(self.hits.clone())
    }

    async fn post_recipe(
        &self,
        draft: &DraftDocument,
    ) -> std::result::Result<RecipeDocument, ApiError> {
        Ok(RecipeDocument {
            id: "created-1".to_string(),
            title: draft.title.clone(),
            publisher: draft.publisher.clone(),
            source_url: draft.source_url.clone(),
            image_url: draft.image_url.clone(),
            servings: draft.servings,
            cooking_time: draft.cooking_time,
            ingredients: draft.ingredients.clone(),
            key: Some("user-key".to_string()),
        })
    }
}

/// Store backed by a map shared between sessions, standing in for a browser's
/// persistent localStorage.
#[derive(Clone, Default)]
struct SharedStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Render call recorded by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Render(ViewData),
    Update(ViewData),
    Spinner,
    Error(String),
    Close,
}

type CallLog = Arc<Mutex<Vec<(SurfaceId, Call)>>>;

struct RecordingSurface {
    id: SurfaceId,
    log: CallLog,
}

impl Surface for RecordingSurface {
    fn render(&mut self, data: &ViewData) {
        self.log.lock().unwrap().push((self.id, Call::Render(data.clone())));
    }

    fn update(&mut self, data: &ViewData) {
        self.log.lock().unwrap().push((self.id, Call::Update(data.clone())));
    }

    fn render_spinner(&mut self) {
        self.log.lock().unwrap().push((self.id, Call::Spinner));
    }

    fn render_error(&mut self, message: &str) {
        self.log
            .lock()
            .unwrap()
            .push((self.id, Call::Error(message.to_string())));
    }

    fn close(&mut self) {
        self.log.lock().unwrap().push((self.id, Call::Close));
    }
}

fn recording_surfaces(log: &CallLog) -> SurfaceRegistry {
    let mut registry = SurfaceRegistry::new();
    for id in [
        SurfaceId::Recipe,
        SurfaceId::Results,
        SurfaceId::Pagination,
        SurfaceId::Bookmarks,
        SurfaceId::AddRecipe,
    ] {
        registry.register(
            id,
            Box::new(RecordingSurface {
                id,
                log: Arc::clone(log),
            }),
        );
    }
    registry
}

fn session_with(api: FixtureApi, store: SharedStore, log: &CallLog) -> Session {
    Session::new(
        Config::default(),
        Box::new(api),
        Box::new(store),
        recording_surfaces(log),
        Box::new(MemoryLocation::new()),
    )
}

fn calls_on(log: &CallLog, surface: SurfaceId) -> Vec<Call> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|(id, _)| *id == surface)
        .map(|(_, call)| call.clone())
        .collect()
}

#[tokio::test]
async fn search_paginate_open_and_bookmark() {
    let log: CallLog = CallLog::default();
    let store = SharedStore::default();
    let mut session = session_with(FixtureApi::new(30), store.clone(), &log);
    session.start().await;

    session
        .dispatch(Event::SearchSubmitted {
            query: "pizza".to_string(),
        })
        .await;

    let results_calls = calls_on(&log, SurfaceId::Results);
    assert_eq!(results_calls[0], Call::Spinner);
    match &results_calls[1] {
        Call::Render(ViewData::Results(page)) => {
            assert_eq!(page.len(), 10);
            assert_eq!(page[0].id, "r0");
        }
        other => panic!("unexpected call: {other:?}"),
    }
    assert!(calls_on(&log, SurfaceId::Pagination)
        .iter()
        .any(|c| matches!(c, Call::Render(ViewData::Pagination { page: 1, page_count: 3 }))));

    session.dispatch(Event::PageRequested { page: 2 }).await;
    assert_eq!(session.state().search.page, 2);

    session
        .dispatch(Event::RecipeSelected {
            id: "r12".to_string(),
        })
        .await;
    assert_eq!(session.state().recipe.as_ref().unwrap().id, "r12");

    session.dispatch(Event::BookmarkToggled).await;
    assert!(session.state().bookmarks.contains("r12"));
    assert!(session.state().recipe.as_ref().unwrap().bookmarked);

    // A fresh session over the same store rehydrates the bookmark.
    let log2: CallLog = CallLog::default();
    let mut restored = session_with(FixtureApi::new(30), store, &log2);
    restored.start().await;

    assert!(restored.state().bookmarks.contains("r12"));
    assert!(calls_on(&log2, SurfaceId::Bookmarks)
        .iter()
        .any(|c| matches!(c, Call::Render(ViewData::Bookmarks(b)) if b.len() == 1)));

    // Opening the bookmarked recipe again derives the flag.
    restored
        .dispatch(Event::RecipeSelected {
            id: "r12".to_string(),
        })
        .await;
    assert!(restored.state().recipe.as_ref().unwrap().bookmarked);
}

#[tokio::test]
async fn failed_recipe_load_clears_and_renders_error() {
    let log: CallLog = CallLog::default();
    let mut session = session_with(FixtureApi::new(5), SharedStore::default(), &log);

    session
        .dispatch(Event::RecipeSelected {
            id: "r1".to_string(),
        })
        .await;
    assert!(session.state().recipe.is_some());

    session
        .dispatch(Event::RecipeSelected {
            id: "missing".to_string(),
        })
        .await;

    assert!(session.state().recipe.is_none());
    let errors: Vec<_> = calls_on(&log, SurfaceId::Recipe)
        .into_iter()
        .filter(|c| matches!(c, Call::Error(_)))
        .collect();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        Call::Error(message) => assert!(message.contains("could not load")),
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn failed_search_keeps_previous_results() {
    let log: CallLog = CallLog::default();
    let mut api = FixtureApi::new(8);
    api.fail_query = Some("pasta".to_string());
    let mut session = session_with(api, SharedStore::default(), &log);

    session
        .dispatch(Event::SearchSubmitted {
            query: "pizza".to_string(),
        })
        .await;
    assert_eq!(session.state().search.results.len(), 8);

    session
        .dispatch(Event::SearchSubmitted {
            query: "pasta".to_string(),
        })
        .await;

    // The failed query never commits; the pizza results stay current.
    assert_eq!(session.state().search.query, "pizza");
    assert_eq!(session.state().search.results.len(), 8);
    assert!(calls_on(&log, SurfaceId::Results)
        .iter()
        .any(|c| matches!(c, Call::Error(m) if m.contains("connection refused"))));
}

#[tokio::test]
async fn servings_rescale_ingredient_quantities() {
    let log: CallLog = CallLog::default();
    let mut session = session_with(FixtureApi::new(3), SharedStore::default(), &log);

    session
        .dispatch(Event::RecipeSelected {
            id: "r0".to_string(),
        })
        .await;
    session.dispatch(Event::ServingsAdjusted { servings: 8 }).await;

    let recipe = session.state().recipe.as_ref().unwrap();
    assert_eq!(recipe.servings, 8);
    assert_eq!(recipe.ingredients[0].quantity, Some(4.0));
}

#[tokio::test]
async fn upload_flow_schedules_close_and_soft_reset() {
    let log: CallLog = CallLog::default();
    let store = SharedStore::default();
    let mut session = session_with(FixtureApi::new(3), store, &log);

    session
        .dispatch(Event::RecipeSubmitted {
            draft: RecipeDraft {
                title: "Focaccia".to_string(),
                source_url: "https://example.com".to_string(),
                image_url: String::new(),
                publisher: "me".to_string(),
                cooking_minutes: 45,
                servings: 6,
                ingredients: vec!["2,cups,flour".to_string(), ",pinch,salt".to_string()],
            },
        })
        .await;

    // Upload committed: created recipe is current, not auto-bookmarked.
    let recipe = session.state().recipe.as_ref().unwrap();
    assert_eq!(recipe.id, "created-1");
    assert!(!recipe.bookmarked);
    assert!(calls_on(&log, SurfaceId::AddRecipe)
        .iter()
        .any(|c| matches!(c, Call::Render(ViewData::Message(_)))));
    assert_eq!(session.scheduled_len(), 2);

    // Firing the deferred events closes the window and soft-resets.
    session.flush_scheduled().await;
    assert!(calls_on(&log, SurfaceId::AddRecipe).contains(&Call::Close));
    assert!(session.state().recipe.is_none());
    assert_eq!(session.scheduled_len(), 0);
}

#[tokio::test]
async fn cancelled_deferred_events_never_fire() {
    let log: CallLog = CallLog::default();
    let mut session = session_with(FixtureApi::new(3), SharedStore::default(), &log);

    session
        .dispatch(Event::RecipeSubmitted {
            draft: RecipeDraft {
                title: "Focaccia".to_string(),
                source_url: "https://example.com".to_string(),
                image_url: String::new(),
                publisher: "me".to_string(),
                cooking_minutes: 45,
                servings: 6,
                ingredients: vec!["2,cups,flour".to_string()],
            },
        })
        .await;
    assert_eq!(session.scheduled_len(), 2);

    session.cancel_scheduled();
    assert_eq!(session.scheduled_len(), 0);

    // With nothing scheduled, running the schedule returns at once and no
    // deferred event fires: the window stays open, the recipe stays current.
    session.run_scheduled().await;
    assert!(!calls_on(&log, SurfaceId::AddRecipe).contains(&Call::Close));
    assert_eq!(session.state().recipe.as_ref().unwrap().id, "created-1");
}

#[tokio::test(start_paused = true)]
async fn run_scheduled_fires_deferred_events_in_deadline_order() {
    let log: CallLog = CallLog::default();
    let mut session = session_with(FixtureApi::new(3), SharedStore::default(), &log);

    session
        .dispatch(Event::RecipeSubmitted {
            draft: RecipeDraft {
                title: "Focaccia".to_string(),
                source_url: "https://example.com".to_string(),
                image_url: String::new(),
                publisher: "me".to_string(),
                cooking_minutes: 45,
                servings: 6,
                ingredients: vec!["2,cups,flour".to_string()],
            },
        })
        .await;
    assert_eq!(session.scheduled_len(), 2);

    // Paused clock: sleeps auto-advance, so this completes immediately while
    // still honoring the deadlines.
    session.run_scheduled().await;
    assert_eq!(session.scheduled_len(), 0);
    assert!(session.state().recipe.is_none());

    // The window close (scheduled first) fires before the soft reset's
    // bookmark re-render.
    let entries = log.lock().unwrap().clone();
    let close_at = entries
        .iter()
        .position(|(id, call)| *id == SurfaceId::AddRecipe && *call == Call::Close)
        .expect("window close fired");
    let reset_render_at = entries
        .iter()
        .rposition(|(id, call)| {
            *id == SurfaceId::Bookmarks && matches!(call, Call::Render(ViewData::Bookmarks(_)))
        })
        .expect("soft reset re-rendered bookmarks");
    assert!(close_at < reset_render_at);
}

#[tokio::test]
async fn malformed_draft_never_reaches_the_service() {
    let log: CallLog = CallLog::default();
    let mut session = session_with(FixtureApi::new(3), SharedStore::default(), &log);

    session
        .dispatch(Event::RecipeSubmitted {
            draft: RecipeDraft {
                title: "Broken".to_string(),
                source_url: String::new(),
                image_url: String::new(),
                publisher: "me".to_string(),
                cooking_minutes: 10,
                servings: 2,
                ingredients: vec!["just-a-description".to_string()],
            },
        })
        .await;

    assert!(session.state().recipe.is_none());
    let calls = calls_on(&log, SurfaceId::AddRecipe);
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        Call::Error(message) => assert!(message.contains("just-a-description")),
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn start_loads_recipe_referenced_by_location() {
    let log: CallLog = CallLog::default();
    let mut session = Session::new(
        Config::default(),
        Box::new(FixtureApi::new(3)),
        Box::new(SharedStore::default()),
        recording_surfaces(&log),
        Box::new(MemoryLocation::at("r2")),
    );
    session.start().await;

    assert_eq!(session.state().recipe.as_ref().unwrap().id, "r2");
}
