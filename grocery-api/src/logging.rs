use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::AppError;

/// `RUST_LOG` 优先，否则使用配置的级别；sqlx 的逐条语句日志默认降到 warn
pub fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let formatting_layer = match config.format.as_str() {
        "json" => fmt::layer().json().with_current_span(true).boxed(),
        "compact" => fmt::layer().compact().with_target(true).boxed(),
        _ => fmt::layer().pretty().boxed(),
    };

    registry()
        .with(env_filter)
        .with(formatting_layer)
        .try_init()
        .map_err(|e| AppError::Internal(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

fn default_directives(level: &str) -> String {
    format!("{},sqlx=warn,tower_http=debug", level)
}
