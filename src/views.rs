//! View collaborator capability interface.
//!
//! Rendering is external to the application core. Each UI region implements
//! the [`Surface`] capability trait and is registered once at session start
//! under a [`SurfaceId`]; the controller only ever emits render actions
//! against those ids and never touches rendering internals. There is no view
//! inheritance hierarchy -- a concrete view simply satisfies the trait.

use std::collections::HashMap;

use crate::app::ViewData;

/// Identity of a registered view collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    /// Recipe detail view.
    Recipe,
    /// Search input view.
    Search,
    /// Search result list view.
    Results,
    /// Pagination controls view.
    Pagination,
    /// Bookmark list view.
    Bookmarks,
    /// Add-recipe submission view.
    AddRecipe,
}

/// Capability interface every view collaborator satisfies.
///
/// The controller calls these methods through the registry; view code never
/// calls back into the core except by raising events. All methods take
/// `&mut self` so surfaces may keep their own drawing state.
pub trait Surface {
    /// Draws the surface from scratch with `data`.
    fn render(&mut self, data: &ViewData);

    /// Patches the surface in place with `data`.
    ///
    /// Used where the original markup should be preserved (e.g. highlighting
    /// the active search result without re-listing the page).
    fn update(&mut self, data: &ViewData);

    /// Shows a loading indicator.
    fn render_spinner(&mut self);

    /// Shows an error indicator with a user-visible message.
    fn render_error(&mut self, message: &str);

    /// Closes the surface (submission modal). Default is a no-op; only
    /// surfaces with a dismissable window need to implement it.
    fn close(&mut self) {}
}

/// One-time binding of surfaces to their ids.
///
/// Built at session construction; lookups of unregistered ids are logged and
/// ignored so a partially wired host (or a headless test) never crashes the
/// session.
#[derive(Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<SurfaceId, Box<dyn Surface + Send>>,
}

impl SurfaceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `surface` under `id`, replacing any previous binding.
    pub fn register(&mut self, id: SurfaceId, surface: Box<dyn Surface + Send>) {
        self.surfaces.insert(id, surface);
    }

    /// Returns the surface registered under `id`.
    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut (dyn Surface + Send + 'static)> {
        let surface = self.surfaces.get_mut(&id).map(Box::as_mut);
        if surface.is_none() {
            tracing::debug!(surface = ?id, "no surface registered, render call dropped");
        }
        surface
    }
}

impl std::fmt::Debug for SurfaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceRegistry")
            .field("registered", &self.surfaces.keys().collect::<Vec<_>>())
            .finish()
    }
}
