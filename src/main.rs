mod config;
mod db;
mod dtos;
mod error;
mod handlers;
mod logging;
mod middleware;
mod models;
mod routes;

use std::process::ExitCode;
use std::sync::Arc;

use config::Config;
use db::UserExt;
use dotenvy::dotenv;
use routes::create_router;

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<dyn UserExt>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // -- 加载 .env 中的环境变量（文件可以不存在）
    dotenv().ok();

    // -- 加载配置
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("🔥 Invalid configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    // -- 初始化日志，guard 需要保持到进程结束
    let _log_guard = logging::init(&config);

    // -- 连接数据库，失败则直接退出
    let db_client = match db::connect(&config).await {
        Ok(client) => {
            tracing::info!("✅Connection to the database is successful!");
            client
        }
        Err(err) => {
            tracing::error!("🔥 Failed to connect to the database: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let app_state = AppState {
        env: config.clone(),
        db_client: Arc::new(db_client.clone()),
    };

    let app = create_router(Arc::new(app_state));

    let listener = match tokio::net::TcpListener::bind(config.bind_addr()).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("🔥 Failed to bind {}: {}", config.bind_addr(), err);
            db_client.shutdown().await;
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Server running on {}", config.bind_addr());

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // -- 释放数据库连接
    db_client.shutdown().await;

    match served {
        Ok(()) => {
            tracing::info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("Server error: {}", err);
            ExitCode::FAILURE
        }
    }
}

// -- 等待 Ctrl-C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
