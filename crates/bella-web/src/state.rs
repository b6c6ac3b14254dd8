//! Application state.

use bella_core::{Clock, SystemClock};
use bella_db::DbPool;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Arc<DbPool>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }
}
