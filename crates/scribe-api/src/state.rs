use std::sync::Arc;

use tracing::error;

use scribe_completion::CompletionClient;
use scribe_db::Database;

use crate::generate::GeneratedContent;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub completion: CompletionClient,
    pub generated_content: GeneratedContent,
}

/// Run a store operation off the async runtime.
pub async fn run_db<F, T>(state: &AppState, f: F) -> anyhow::Result<T>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            anyhow::Error::from(e)
        })?
}
