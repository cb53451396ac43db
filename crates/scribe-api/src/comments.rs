use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::info;

use scribe_db::models::{CommentChanges, CommentRow};
use scribe_types::api::CommentFields;
use scribe_types::models::Comment;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, run_db};
use crate::validate::{FieldErrors, parse_id};

pub fn comment_from_row(row: CommentRow) -> Comment {
    Comment {
        id: row.id,
        post: row.post_id,
        content: row.content,
    }
}

/// Validate a comment body, including that `post` names an existing post.
async fn validate(
    state: &AppState,
    body: Result<Json<CommentFields>, JsonRejection>,
    partial: bool,
) -> ApiResult<CommentChanges> {
    let Json(fields) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;

    let mut errors = FieldErrors::default();
    let post_id = errors.primary_key("post", fields.post, !partial);
    let content = errors.text("content", fields.content, !partial);

    if let Some(pid) = post_id {
        if !run_db(state, move |db| db.post_exists(pid)).await? {
            errors.add("post", format!("Invalid pk \"{}\" - object does not exist.", pid));
        }
    }

    errors.finish(CommentChanges { post_id, content })
}

/// GET /api/comments/
pub async fn list_comments(State(state): State<AppState>) -> ApiResult<Json<Vec<Comment>>> {
    let rows = run_db(&state, |db| db.list_comments()).await?;
    Ok(Json(rows.into_iter().map(comment_from_row).collect()))
}

/// POST /api/comments/
pub async fn create_comment(
    State(state): State<AppState>,
    body: Result<Json<CommentFields>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let changes = validate(&state, body, false).await?;
    let (Some(post_id), Some(content)) = (changes.post_id, changes.content) else {
        // validate() with partial = false guarantees both fields.
        return Err(ApiError::MalformedBody("post and content are required".into()));
    };

    let row = run_db(&state, move |db| db.insert_comment(post_id, &content)).await?;

    info!(comment_id = row.id, post_id, "Comment created");
    Ok((StatusCode::CREATED, Json(comment_from_row(row))))
}

/// GET /api/comments/{id}/
pub async fn get_comment(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Comment>> {
    let id = parse_id(&id)?;
    let row = run_db(&state, move |db| db.get_comment(id)).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(comment_from_row(row)))
}

/// PUT /api/comments/{id}/
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CommentFields>, JsonRejection>,
) -> ApiResult<Json<Comment>> {
    apply_update(state, &id, body, false).await
}

/// PATCH /api/comments/{id}/
pub async fn partial_update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CommentFields>, JsonRejection>,
) -> ApiResult<Json<Comment>> {
    apply_update(state, &id, body, true).await
}

async fn apply_update(
    state: AppState,
    id: &str,
    body: Result<Json<CommentFields>, JsonRejection>,
    partial: bool,
) -> ApiResult<Json<Comment>> {
    let id = parse_id(id)?;
    if run_db(&state, move |db| db.get_comment(id)).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let changes = validate(&state, body, partial).await?;
    let row = run_db(&state, move |db| db.update_comment(id, &changes))
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(comment_from_row(row)))
}

/// DELETE /api/comments/{id}/
pub async fn delete_comment(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    if !run_db(&state, move |db| db.delete_comment(id)).await? {
        return Err(ApiError::NotFound);
    }
    info!(comment_id = id, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}
