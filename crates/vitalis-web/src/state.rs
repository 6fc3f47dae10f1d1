//! Shared application state for the web server.

use std::sync::Arc;

use vitalis_model::ModelState;

use crate::templates::Templates;

/// Built once at start-up and injected into every Axum handler.
/// Nothing in here is mutated after construction.
pub struct AppState {
    pub models: ModelState,
    pub templates: Templates,
}

impl AppState {
    pub fn new(models: ModelState) -> Result<Self, minijinja::Error> {
        Ok(Self { models, templates: Templates::new()? })
    }
}

pub type SharedState = Arc<AppState>;
