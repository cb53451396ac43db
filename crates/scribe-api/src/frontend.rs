use axum::response::Html;

const FRONTEND_PAGE: &str = include_str!("../templates/frontend.html");

/// GET / — the single-page frontend. It talks to the JSON API from the browser.
pub async fn index() -> Html<&'static str> {
    Html(FRONTEND_PAGE)
}
