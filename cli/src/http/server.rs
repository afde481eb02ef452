//! HTTP服务器生命周期管理

use super::{
    middleware::{create_timeout_layer, request_logger},
    routes::create_router,
    AppState,
};
use crate::commands::cli::ServeArgs;
use axum::middleware;
use cloakgate_core::api::{AppConfig, AuditLog, CliError, HttpClassifier};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

/// 处理 serve 命令
pub async fn handle_serve(args: ServeArgs, cfg: AppConfig) -> Result<(), CliError> {
    let session_id = Uuid::new_v4().to_string();

    // 合并配置：CLI 参数优先，配置文件作为默认值
    let port = if args.port == 8080 {
        cfg.server.port
    } else {
        args.port
    };

    let host = if args.host == "127.0.0.1" {
        cfg.server.host.clone()
    } else {
        args.host.clone()
    };

    // 审计日志在启动时打开一次，之后所有请求共享
    let audit = AuditLog::open(&cfg.audit.directory).map_err(|e| CliError::Audit(e.to_string()))?;

    let classifier =
        Arc::new(HttpClassifier::new(&cfg.classifier).map_err(|e| CliError::Server(e.to_string()))?);

    // 创建 shutdown channel
    let (shutdown_tx, _) = broadcast::channel(1);

    let state = AppState::new(session_id.clone(), cfg, audit, classifier, shutdown_tx);

    start_server(session_id, host, port, state)
        .await
        .map_err(|e: Box<dyn std::error::Error + Send + Sync>| CliError::Server(e.to_string()))?;

    Ok(())
}

/// 启动HTTP服务器
pub async fn start_server(
    session_id: String,
    host: String,
    port: u16,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!(
        "Starting HTTP server on {}:{} (session: {})",
        host, port, session_id
    );

    // 构建路由
    let router = create_router(state.clone());

    // 添加中间件
    let app = router
        .layer(middleware::from_fn(request_logger))
        .layer(create_timeout_layer());

    // 解析地址
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // 克隆 shutdown_rx 用于优雅关闭
    let mut shutdown_rx = state.shutdown_tx.subscribe();

    // 启动服务器并等待关闭信号
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C signal");
            }
            _ = shutdown_rx.recv() => {
                info!("Received shutdown signal");
            }
            _ = wait_for_sigterm() => {
                info!("Received SIGTERM signal");
            }
        }

        info!("Starting graceful shutdown...");
    })
    .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// 等待 SIGTERM 信号（Unix系统）
#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to setup SIGTERM handler");
    sigterm.recv().await;
}

/// Windows 系统不支持 SIGTERM，使用空操作
#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
