use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{debug, info};

use scribe_completion::text::{title_case, trim_truncated_sentence};
use scribe_types::api::GeneratePostRequest;
use scribe_types::models::Post;

use crate::error::{ApiError, ApiResult};
use crate::posts::post_from_row;
use crate::state::{AppState, run_db};

/// Author recorded on every generated post.
pub const AI_AUTHOR: &str = "AI Bot";

/// Which text a generated post stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeneratedContent {
    /// The completion as returned, trimmed. Cleanup still runs and is logged.
    #[default]
    Raw,
    /// The completion with a trailing sentence fragment removed. Falls back to
    /// the raw text when no complete sentence survives.
    Cleaned,
}

impl GeneratedContent {
    pub fn from_flag(store_cleaned: bool) -> Self {
        if store_cleaned { Self::Cleaned } else { Self::Raw }
    }

    pub fn select(self, raw: String, cleaned: String) -> String {
        match self {
            Self::Cleaned if !cleaned.is_empty() => cleaned,
            _ => raw,
        }
    }
}

/// POST /api/generate_post/
///
/// Body `{"prompt": "..."}`. Calls the completion service synchronously and
/// stores the result as a new post. Nothing is stored unless every step
/// succeeds.
pub async fn generate_post(
    State(state): State<AppState>,
    body: Result<Json<GeneratePostRequest>, JsonRejection>,
) -> ApiResult<Json<Post>> {
    let prompt = match body {
        Ok(Json(req)) => req.prompt.unwrap_or_default(),
        Err(e) => {
            debug!("Unreadable generate_post body: {}", e.body_text());
            String::new()
        }
    };
    if prompt.is_empty() {
        return Err(ApiError::MissingPrompt);
    }

    let raw = state.completion.complete(&prompt).await?;

    let cleaned = trim_truncated_sentence(&raw);
    if cleaned != raw {
        debug!(raw_len = raw.len(), cleaned_len = cleaned.len(), "Trailing fragment removed from completion");
    }

    let title = title_case(&prompt);
    let content = state.generated_content.select(raw, cleaned);

    let row = run_db(&state, move |db| db.insert_post(&title, &content, AI_AUTHOR))
        .await
        .map_err(ApiError::GenerationStorage)?;

    info!(post_id = row.id, "Generated post stored");
    Ok(Json(post_from_row(row)))
}
