use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use scribe_api::generate::GeneratedContent;
use scribe_api::{AppStateInner, build_router};
use scribe_completion::{CompletionClient, CompletionConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribe_server=debug,scribe_api=debug,scribe_db=debug,scribe_completion=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("SCRIBE_DB_PATH").unwrap_or_else(|_| "scribe.db".into());
    let host = std::env::var("SCRIBE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("SCRIBE_PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()
        .context("SCRIBE_PORT must be a valid port number")?;
    let store_cleaned = std::env::var("SCRIBE_STORE_CLEANED_CONTENT")
        .map(|v| parse_flag(&v))
        .unwrap_or(false);

    let completion_config = CompletionConfig::from_env().context("completion service configuration")?;
    info!(
        "Completion service: {} (model {}, timeout {:?})",
        completion_config.api_url, completion_config.model, completion_config.timeout
    );
    let completion = CompletionClient::new(completion_config)?;

    let generated_content = GeneratedContent::from_flag(store_cleaned);
    if generated_content == GeneratedContent::Cleaned {
        warn!("SCRIBE_STORE_CLEANED_CONTENT is set: generated posts store cleaned text");
    }

    // Init database
    let db = scribe_db::Database::open(&PathBuf::from(&db_path))?;

    let state = Arc::new(AppStateInner {
        db,
        completion,
        generated_content,
    });
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Scribe listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await;
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await;
        info!("Received Ctrl+C, shutting down...");
    }
}
