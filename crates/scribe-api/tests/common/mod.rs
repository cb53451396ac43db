#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::routing::post;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use scribe_api::generate::GeneratedContent;
use scribe_api::{AppState, AppStateInner, build_router};
use scribe_completion::{CompletionClient, CompletionConfig};
use scribe_db::Database;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub fn post_count(&self) -> usize {
        self.state.db.list_posts().unwrap().len()
    }
}

/// Upstream stand-in that records how many times it was called.
pub struct Upstream {
    pub url: String,
    pub calls: Arc<AtomicUsize>,
}

impl Upstream {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Serve a fake completion service on an ephemeral port. Each call gets the
/// given status and body after `delay`.
pub async fn spawn_upstream(status: StatusCode, body: Value, delay: Duration) -> Upstream {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let app = Router::new().route(
        "/v1/completions",
        post(move || {
            let counter = counter.clone();
            let body = body.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                (status, axum::Json(body))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Upstream {
        url: format!("http://{}/v1/completions", addr),
        calls,
    }
}

pub async fn upstream_returning(text: &str) -> Upstream {
    spawn_upstream(StatusCode::OK, json!({ "choices": [{ "text": text }] }), Duration::ZERO).await
}

pub fn build_test_app(upstream_url: &str, generated_content: GeneratedContent) -> TestApp {
    let config = CompletionConfig::new(upstream_url, "test-model", "sk-test")
        .with_timeout(Duration::from_millis(500));

    let state: AppState = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        completion: CompletionClient::new(config).unwrap(),
        generated_content,
    });

    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

/// App whose completion service is never contacted.
pub fn build_crud_app() -> TestApp {
    build_test_app("http://127.0.0.1:9/v1/completions", GeneratedContent::Raw)
}
