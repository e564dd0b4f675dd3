//! Application state for Corkboard.
//!
//! Contains the shared state that is passed to all handlers.

use std::sync::Arc;

use crate::db::DbPool;
use crate::services::Renderer;
use crate::{config, Result};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Page renderer.
    pub renderer: Arc<Renderer>,
}

impl AppState {
    /// Create a new application state, initializing all services.
    pub async fn new() -> Result<Self> {
        let config = config::config();

        // Initialize database
        let db = crate::db::init_pool(&config.database.path).await?;

        // Initialize database schema
        crate::db::initialize_schema(&db).await?;

        Ok(Self {
            db,
            renderer: Arc::new(Renderer::new()),
        })
    }

    /// Build a state around an existing pool (used by tests).
    pub fn with_pool(db: DbPool) -> Self {
        Self {
            db,
            renderer: Arc::new(Renderer::new()),
        }
    }
}
