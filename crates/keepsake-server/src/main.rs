use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use keepsake_api::AppStateInner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keepsake=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("KEEPSAKE_DB_PATH").unwrap_or_else(|_| "keepsake.db".into());
    let host = std::env::var("KEEPSAKE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("KEEPSAKE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database; the handle lives in the shared state and closes when
    // the state drops at shutdown.
    let db = keepsake_db::Database::open(&PathBuf::from(&db_path))?;
    let state = Arc::new(AppStateInner { db });

    let app: Router = keepsake_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Keepsake server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Shutdown signal received");
}
