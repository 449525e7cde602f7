//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use journal_core::ports::JournalStore;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn JournalStore>,
    pub config: Arc<Config>,
}
