use axum::extract::{FromRequest, Request};
use axum::Json;
use serde_json::Value;

use crate::domain::validation::FieldErrors;
use crate::error::AppError;

/// JSON 请求体；解析失败时返回 `VALIDATION_ERROR` 信封而不是 axum 默认的纯文本
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("rejected request body: {}", rejection.body_text());
                Err(AppError::validation(
                    "Invalid JSON body",
                    FieldErrors::form(rejection.body_text()),
                ))
            }
        }
    }
}
