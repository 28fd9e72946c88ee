//! HTTP search front-end: request decoding, query tokenization, and the
//! ranked conjunctive query against the index store.

pub mod pages;

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use percent_encoding::percent_decode_str;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::core::error::QuarryError;
use crate::html;
use crate::store::SearchBackend;

pub const SERVER_NAME: &str = "SearchEngine/1.0";

#[derive(Clone)]
pub struct ServerState {
    pub backend: Arc<dyn SearchBackend>,
    pub max_results: i64,
}

/// Assemble the router: the search page on `/` and `/search`, results on
/// `POST /search`, and an HTML 404 for every other target or method.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(search_form).fallback(not_found))
        .route(
            "/search",
            get(search_form).post(search_results).fallback(not_found),
        )
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            header::SERVER,
            HeaderValue::from_static(SERVER_NAME),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Extract and decode the `q` parameter from a raw query string or form
/// body: the value runs to the first `&`; `+` means space only in form
/// bodies; `%HH` pairs decode byte-wise with malformed sequences left
/// literal.
fn query_param(raw: &str, form_encoded: bool) -> String {
    let Some(pos) = raw.find("q=") else {
        return String::new();
    };
    let mut value = &raw[pos + 2..];
    if let Some(amp) = value.find('&') {
        value = &value[..amp];
    }

    let value = if form_encoded {
        value.replace('+', " ")
    } else {
        value.to_string()
    };

    percent_decode_str(&value).decode_utf8_lossy().into_owned()
}

async fn search_form(RawQuery(raw): RawQuery) -> Html<String> {
    let query = raw.as_deref().map(|r| query_param(r, false)).unwrap_or_default();
    Html(pages::search_page(&query))
}

async fn search_results(
    State(state): State<Arc<ServerState>>,
    body: String,
) -> Result<Html<String>, ServerError> {
    let query = query_param(&body, true);
    let terms = html::parse_query(&query);

    let results = if terms.is_empty() {
        Vec::new()
    } else {
        state.backend.search(&terms, state.max_results).await?
    };

    info!("search for {:?} returned {} results", query, results.len());
    Ok(Html(pages::results_page(&results, &query)))
}

async fn not_found() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(pages::error_page("Page not found")),
    )
}

/// Handler-level failure: logged, rendered as the HTML 500 page.
struct ServerError(QuarryError);

impl From<QuarryError> for ServerError {
    fn from(err: QuarryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!("request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(pages::error_page("Internal server error")),
        )
            .into_response()
    }
}
