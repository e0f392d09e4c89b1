use report_dashboard::config::{resolve_port, resolve_session_settings};
use report_dashboard::{AppState, load_data, resolve_data_path, router};
use std::net::SocketAddr;
use tokio::fs;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_path = resolve_data_path()?;
    if let Some(parent) = data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let data = load_data(&data_path).await;
    let settings = resolve_session_settings();
    info!(
        "kpi order scope {:?}, editable {}",
        settings.order_scope, settings.editable
    );
    let state = AppState::new(data_path, data, settings);

    let addr = SocketAddr::from(([0, 0, 0, 0], resolve_port()));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
