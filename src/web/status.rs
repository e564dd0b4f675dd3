//! Status routes.
//!
//! Routes:
//! - GET /health - Basic health check

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{db, AppState, Result};

/// Build status routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Basic health check.
///
/// GET /health
#[axum::debug_handler]
async fn health_check(State(state): State<AppState>) -> Result<Json<Value>> {
    db::health_check(&state.db).await?;
    Ok(Json(json!({
        "status": "ok",
        "service": "corkboard",
    })))
}
