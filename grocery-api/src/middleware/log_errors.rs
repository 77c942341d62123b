use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

// 错误日志中间件
pub async fn log_errors(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), "request failed");
    }

    response
}
