use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod app;
mod http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sendlater_gateway=info,sendlater_scheduler=info,tower_http=debug".into()),
        )
        .init();

    // load config: SENDLATER_CONFIG env > ~/.sendlater/sendlater.toml
    let config_path = std::env::var("SENDLATER_CONFIG").ok();
    let config = sendlater_core::SendlaterConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        sendlater_core::SendlaterConfig::default()
    });

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    // One connection behind one lock: HTTP handlers and the engine serialise
    // every read-modify-write through the same store.
    let store = sendlater_scheduler::JobStore::new(rusqlite::Connection::open(db_path)?)?;

    let mailer: Arc<dyn sendlater_scheduler::Mailer> = Arc::new(sendlater_scheduler::LogMailer);
    let engine = sendlater_scheduler::SchedulerEngine::new(
        store.clone(),
        mailer,
        Duration::from_secs(config.scheduler.tick_secs),
    );

    let state = Arc::new(app::AppState::new(config, store));
    let router = app::build_router(state);

    // spawn scheduler engine loop in background
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move { engine.run(shutdown_rx).await });

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("sendlater gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    // signal scheduler to stop
    let _ = shutdown_tx.send(true);
    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
