use axum::{extract::State, routing::post, Router};
use std::sync::Arc;

use crate::domain::services::seed_service::{SeedOutcome, SeedService};
use crate::response::{ApiResponse, ApiResult};
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(seed))
}

async fn seed(State(state): State<Arc<AppState>>) -> ApiResult<SeedOutcome> {
    let outcome = SeedService::new(state).seed().await?;
    Ok(ApiResponse::ok(outcome))
}
