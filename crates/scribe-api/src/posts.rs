use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{info, warn};

use scribe_db::models::{PostChanges, PostRow};
use scribe_types::api::PostFields;
use scribe_types::models::Post;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, run_db};
use crate::validate::{FieldErrors, parse_id};

pub fn post_from_row(row: PostRow) -> Post {
    let created_at = row
        .created_at
        .parse::<chrono::DateTime<chrono::Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            chrono::NaiveDateTime::parse_from_str(&row.created_at, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on post {}: {}", row.created_at, row.id, e);
            chrono::DateTime::default()
        });

    Post {
        id: row.id,
        title: row.title,
        content: row.content,
        author: row.author,
        created_at,
    }
}

/// Validate a post body. `partial` is set for PATCH, where every field may be
/// omitted; create and PUT require all of them.
fn validate(body: Result<Json<PostFields>, JsonRejection>, partial: bool) -> ApiResult<PostChanges> {
    let Json(fields) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;

    let mut errors = FieldErrors::default();
    let changes = PostChanges {
        title: errors.text("title", fields.title, !partial),
        content: errors.text("content", fields.content, !partial),
        author: errors.text("author", fields.author, !partial),
    };
    errors.finish(changes)
}

/// GET /api/posts/
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    let rows = run_db(&state, |db| db.list_posts()).await?;
    Ok(Json(rows.into_iter().map(post_from_row).collect()))
}

/// POST /api/posts/
pub async fn create_post(
    State(state): State<AppState>,
    body: Result<Json<PostFields>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let changes = validate(body, false)?;

    let row = run_db(&state, move |db| {
        db.insert_post(
            changes.title.as_deref().unwrap_or_default(),
            changes.content.as_deref().unwrap_or_default(),
            changes.author.as_deref().unwrap_or_default(),
        )
    })
    .await?;

    info!(post_id = row.id, "Post created");
    Ok((StatusCode::CREATED, Json(post_from_row(row))))
}

/// GET /api/posts/{id}/
pub async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Post>> {
    let id = parse_id(&id)?;
    let row = run_db(&state, move |db| db.get_post(id)).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(post_from_row(row)))
}

/// PUT /api/posts/{id}/
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PostFields>, JsonRejection>,
) -> ApiResult<Json<Post>> {
    apply_update(state, &id, body, false).await
}

/// PATCH /api/posts/{id}/
pub async fn partial_update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PostFields>, JsonRejection>,
) -> ApiResult<Json<Post>> {
    apply_update(state, &id, body, true).await
}

async fn apply_update(
    state: AppState,
    id: &str,
    body: Result<Json<PostFields>, JsonRejection>,
    partial: bool,
) -> ApiResult<Json<Post>> {
    // An unknown id is reported before body problems.
    let id = parse_id(id)?;
    if !run_db(&state, move |db| db.post_exists(id)).await? {
        return Err(ApiError::NotFound);
    }

    let changes = validate(body, partial)?;
    let row = run_db(&state, move |db| db.update_post(id, &changes))
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(post_from_row(row)))
}

/// DELETE /api/posts/{id}/
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    if !run_db(&state, move |db| db.delete_post(id)).await? {
        return Err(ApiError::NotFound);
    }
    info!(post_id = id, "Post deleted");
    Ok(StatusCode::NO_CONTENT)
}
