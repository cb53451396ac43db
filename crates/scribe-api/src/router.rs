use axum::{
    Json, Router,
    http::{HeaderMap, HeaderName, header},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use scribe_types::api::ApiRoot;

use crate::state::AppState;
use crate::{comments, frontend, generate, posts};

/// Build the full application: frontend page, CRUD resources, generation
/// endpoint, and the middleware stack (CORS, tracing, request ids).
pub fn build_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    let api = Router::new()
        .route("/api/", get(api_root))
        .route("/api/posts/", get(posts::list_posts).post(posts::create_post))
        .route(
            "/api/posts/{id}/",
            get(posts::get_post)
                .put(posts::update_post)
                .patch(posts::partial_update_post)
                .delete(posts::delete_post),
        )
        .route("/api/comments/", get(comments::list_comments).post(comments::create_comment))
        .route(
            "/api/comments/{id}/",
            get(comments::get_comment)
                .put(comments::update_comment)
                .patch(comments::partial_update_comment)
                .delete(comments::delete_comment),
        )
        .route("/api/generate_post/", post(generate::generate_post))
        .with_state(state);

    Router::new()
        .route("/", get(frontend::index))
        .merge(api)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// GET /api/ — links to each resource collection, absolute when the request
/// carries a Host header.
async fn api_root(headers: HeaderMap) -> Json<ApiRoot> {
    let base = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|host| format!("http://{}", host))
        .unwrap_or_default();

    Json(ApiRoot {
        posts: format!("{}/api/posts/", base),
        comments: format!("{}/api/comments/", base),
    })
}
