//! Application core: state, events, and the actions that connect them.
//!
//! The core is a pure event-in, actions-out machine. [`AppState`] holds the
//! single source of truth, [`handle_event`] applies one event at a time on the
//! session task, and the returned [`Action`]s carry every side effect out to
//! the runtime. No I/O happens inside this module.

pub mod actions;
pub mod handler;
pub mod state;

pub use actions::{Action, DeferredEvent, ViewData};
pub use handler::{handle_event, Event};
pub use state::{AppState, BookmarkSet, RequestId, SearchState};
