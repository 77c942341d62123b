use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// 固定窗口限流参数
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    pub on_startup: bool,
}

impl Config {
    /// 默认值 -> `$CONFIG_PATH/default.toml` -> `APP__*` 环境变量
    pub fn load() -> Result<Self, AppError> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());
        Self::load_from(&config_path)
    }

    /// 从指定目录加载 `default.toml`，文件不存在时只使用默认值与环境变量
    pub fn load_from(config_path: impl AsRef<Path>) -> Result<Self, AppError> {
        let config_path = config_path.as_ref();

        tracing::debug!("Loading configuration from {}", config_path.display());

        let builder = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite://grocery.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("rate_limit.window_secs", 60)?
            .set_default("rate_limit.max_requests", 30)?
            .set_default("seed.on_startup", false)?
            .add_source(config::File::from(config_path.join("default")).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let config = builder.build()?;
        let config: Config = config.try_deserialize()?;

        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
