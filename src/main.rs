// ==========================================
// 零件定位系统 - HTTP 服务主入口
// ==========================================
// 环境变量: LOCATOR_DB_PATH / LOCATOR_BIND_ADDR / LOCATOR_LOG_FORMAT / RUST_LOG
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use parts_locator::app::{build_router, AppState};
use parts_locator::config::ServerConfig;
use parts_locator::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // 初始化日志系统
    logging::init_with_format(config.log_format);

    tracing::info!("==================================================");
    tracing::info!("{}", parts_locator::APP_NAME);
    tracing::info!("系统版本: {}", parts_locator::VERSION);
    tracing::info!("==================================================");
    tracing::info!("使用数据库: {}", config.db_path);

    // 创建AppState
    tracing::info!("正在初始化AppState...");
    let app_state = AppState::new(config.db_path.clone())
        .map_err(|e| anyhow::anyhow!(e))
        .context("无法初始化AppState")?;

    let app = build_router(Arc::new(app_state));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("无法监听地址: {}", config.bind_addr))?;
    tracing::info!("HTTP 服务已启动: http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    tracing::info!("HTTP 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("无法监听退出信号: {}", e);
    }
}
