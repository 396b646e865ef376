use std::sync::Arc;

use crate::config::Config;
use crate::logger::EventLogger;
use crate::store::ContentStore;

/// Shared application state available in all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: ContentStore,
    pub logger: EventLogger,
}

pub mod console;
