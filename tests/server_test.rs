//! Front-end tests over the assembled router: route surface, headers,
//! query decoding, rendering, and error pages.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use webquarry::core::error::QuarryError;
use webquarry::server::{router, ServerState, SERVER_NAME};
use webquarry::store::{SearchBackend, SearchResult};

/// Canned backend recording the terms each search received.
#[derive(Default)]
struct StubBackend {
    results: Vec<SearchResult>,
    calls: AtomicUsize,
    last_terms: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl SearchBackend for StubBackend {
    async fn search(&self, terms: &[String], _limit: i64)
        -> Result<Vec<SearchResult>, QuarryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_terms.lock().unwrap() = terms.to_vec();
        if self.fail {
            return Err(QuarryError::Config("backend down".to_string()));
        }
        Ok(self.results.clone())
    }
}

fn app(backend: Arc<StubBackend>) -> axum::Router {
    router(ServerState {
        backend,
        max_results: 10,
    })
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn hit(url: &str, title: &str, relevance: i64) -> SearchResult {
    SearchResult {
        url: url.to_string(),
        title: title.to_string(),
        snippet: format!("snippet for {}", url),
        relevance,
    }
}

#[tokio::test]
async fn test_root_serves_search_page() {
    let response = app(Arc::new(StubBackend::default()))
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::SERVER).unwrap(),
        SERVER_NAME
    );
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let body = body_text(response).await;
    assert!(body.contains("<form method='post' action='/search'"));
}

#[tokio::test]
async fn test_get_search_prefills_query() {
    let response = app(Arc::new(StubBackend::default()))
        .oneshot(
            Request::get("/search?q=hello%20world")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("value=\"hello world\""));
}

#[tokio::test]
async fn test_post_search_decodes_and_queries() {
    let backend = Arc::new(StubBackend {
        results: vec![hit("http://a.test/", "Alpha", 5)],
        ..Default::default()
    });

    let response = app(backend.clone())
        .oneshot(
            Request::post("/search")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("q=foo+bar%20baz"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        *backend.last_terms.lock().unwrap(),
        vec!["foo", "bar", "baz"]
    );

    let body = body_text(response).await;
    assert!(body.contains("Found 1 results for \"foo bar baz\""));
    assert!(body.contains("Alpha"));
    assert!(body.contains("Relevance score: 5"));
}

#[tokio::test]
async fn test_post_with_empty_query_skips_backend() {
    let backend = Arc::new(StubBackend::default());

    let response = app(backend.clone())
        .oneshot(
            Request::post("/search")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("q=%20%20"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    assert!(body_text(response).await.contains("Found 0 results"));
}

#[tokio::test]
async fn test_unknown_route_is_html_404() {
    let response = app(Arc::new(StubBackend::default()))
        .oneshot(Request::get("/favicon.ico").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(header::SERVER).unwrap(),
        SERVER_NAME
    );
    let body = body_text(response).await;
    assert!(body.contains("Page not found"));
    assert!(body.contains("Back to search"));
}

#[tokio::test]
async fn test_unknown_method_is_html_404() {
    let response = app(Arc::new(StubBackend::default()))
        .oneshot(
            Request::delete("/search")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Page not found"));
}

#[tokio::test]
async fn test_backend_failure_renders_500_page() {
    let backend = Arc::new(StubBackend {
        fail: true,
        ..Default::default()
    });

    let response = app(backend)
        .oneshot(
            Request::post("/search")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("q=anything"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("Internal server error"));
}

#[tokio::test]
async fn test_query_echoed_escaped() {
    let response = app(Arc::new(StubBackend::default()))
        .oneshot(
            Request::post("/search")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("q=%3Cscript%3Ezap%3C%2Fscript%3E"))
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_text(response).await;
    assert!(!body.contains("<script>zap"));
    assert!(body.contains("&lt;script&gt;zap"));
}
