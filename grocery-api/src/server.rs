use axum::{middleware, routing::get, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::{cart, checkout, detections, products, seed, transactions};
use crate::config::Config;
use crate::infrastructure::rate_limit::{FixedWindowLimiter, RateLimiter};
use crate::middleware::log_errors::log_errors;
use crate::response::{panic_response, ApiResponse};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: sqlx::SqlitePool,
    pub rate_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    pub fn new(config: Config, db: sqlx::SqlitePool) -> Self {
        let rate_limiter = Arc::new(FixedWindowLimiter::from_config(&config.rate_limit));
        Self {
            config,
            db,
            rate_limiter,
        }
    }

    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    let app_state = Arc::new(state);

    // 健康检查路由
    let health_route = Router::new().route(
        "/health",
        get(|| async { ApiResponse::ok(json!({ "status": "ok" })) }),
    );

    // API 路由
    let api_routes = Router::new()
        .nest("/products", products::routes(app_state.clone()))
        .nest("/cart", cart::routes())
        .nest("/checkout", checkout::routes())
        .nest("/detections", detections::routes())
        .nest("/transactions", transactions::routes())
        .nest("/seed", seed::routes());

    Router::new()
        .nest("/api", api_routes)
        .merge(health_route)
        .layer(middleware::from_fn(log_errors))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(app_state)
}
