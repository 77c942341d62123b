use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::server::AppState;

/// 客户端标识: `x-forwarded-for` 的第一个地址，否则为 `local`
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("local")
        .to_string()
}

/// Throttles product create/update/delete. Reads pass through.
pub async fn limit_product_mutations(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let action = match *request.method() {
        Method::POST => "post",
        Method::PUT => "put",
        Method::DELETE => "delete",
        _ => return Ok(next.run(request).await),
    };

    let key = format!("products:{}:{}", action, client_key(request.headers()));
    if !state.rate_limiter.check(&key).ok {
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}
