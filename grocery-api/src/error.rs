use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::validation::FieldErrors;
use crate::response::{ErrorBody, ErrorEnvelope};

/// 错误码，随错误响应返回给客户端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    ProductUnknown,
    EmptyCart,
    RateLimit,
    Unexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::ProductUnknown => "PRODUCT_UNKNOWN",
            Self::EmptyCart => "EMPTY_CART",
            Self::RateLimit => "RATE_LIMIT",
            Self::Unexpected => "UNEXPECTED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationError | Self::ProductUnknown | Self::EmptyCart => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            Self::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: FieldErrors },

    #[error("{0}")]
    NotFound(String),

    #[error("Unknown product: {0}")]
    ProductUnknown(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Too many requests")]
    RateLimited,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>, details: FieldErrors) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::ProductUnknown(_) => ErrorCode::ProductUnknown,
            Self::EmptyCart => ErrorCode::EmptyCart,
            Self::RateLimited => ErrorCode::RateLimit,
            Self::Database(_)
            | Self::Migration(_)
            | Self::Config(_)
            | Self::Internal(_) => ErrorCode::Unexpected,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.code().status()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        let body = match self {
            AppError::Validation { message, details } => ErrorBody {
                code,
                message,
                details: serde_json::to_value(details).ok(),
            },
            AppError::NotFound(_) | AppError::ProductUnknown(_) | AppError::EmptyCart | AppError::RateLimited => {
                ErrorBody {
                    code,
                    message: self.to_string(),
                    details: None,
                }
            }
            // 只记录日志，不把底层错误返回给客户端
            other => {
                tracing::error!(error = %other, "unexpected failure while handling request");
                ErrorBody::unexpected()
            }
        };

        (code.status(), Json(ErrorEnvelope { error: body })).into_response()
    }
}
