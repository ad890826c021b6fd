//! JSON API handlers, error responses and request logging.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use folio_content::{paginate, ContentError, PostSummary};

use crate::server::AppState;

/// Caching policy for API responses.
pub const API_CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=30";

const DEFAULT_PAGE: usize = 1;
const DEFAULT_LIMIT: usize = 10;

/// An unexpected failure while handling a request.
#[derive(Debug, thiserror::Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "Internal Server Error",
                "details": self.to_string(),
            })),
        )
            .into_response()
    }
}

/// Query parameters of the listing endpoint.
///
/// Values that are not positive integers fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    page: Option<String>,
    limit: Option<String>,
}

impl ListParams {
    fn page(&self) -> usize {
        parse_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    fn limit(&self) -> usize {
        parse_or(self.limit.as_deref(), DEFAULT_LIMIT)
    }
}

fn parse_or(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

/// `GET /api/blog?page&limit`
pub(crate) async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Response, AppError> {
    let summaries: Vec<PostSummary> = state
        .repository
        .list_posts()?
        .iter()
        .map(PostSummary::from)
        .collect();

    let page = paginate(&summaries, params.page(), params.limit());

    Ok(cached(Json(page)))
}

/// `GET|HEAD /api/blog/{slug}`
pub(crate) async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    match state.repository.get_post(&slug)? {
        Some(post) => Ok(cached(Json(post))),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Post not found" })),
        )
            .into_response()),
    }
}

fn cached(body: impl IntoResponse) -> Response {
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static(API_CACHE_CONTROL),
        )],
        body,
    )
        .into_response()
}

/// Log method, path, status and duration of every request.
pub(crate) async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        tracing::error!(%method, %path, status, duration_ms, "request failed");
    } else {
        tracing::info!(%method, %path, status, duration_ms, "request");
    }

    response
}
