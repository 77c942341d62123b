use std::sync::Arc;

use anyhow::{Context, Result};

use grocery_api::config::Config;
use grocery_api::domain::services::seed_service::SeedService;
use grocery_api::infrastructure::database::sqlite::init_sqlite;
use grocery_api::logging::init_logging;
use grocery_api::server::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 加载配置
    let config = Config::load().context("failed to load configuration")?;

    // 初始化日志
    init_logging(&config.logging)?;

    tracing::info!("Starting grocery API");

    // 初始化数据库连接并执行迁移
    let db_pool = init_sqlite(&config)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;

    let app_state = AppState::new(config.clone(), db_pool);

    if config.seed.on_startup {
        let outcome = SeedService::new(Arc::new(app_state.clone())).seed().await?;
        tracing::info!(count = outcome.count, "{}", outcome.message);
    }

    // 创建并启动服务器
    let app = create_app(app_state);
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on {}", &addr);

    axum::serve(listener, app).await?;
    Ok(())
}
