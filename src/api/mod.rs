//! Inbound HTTP surface: routing and the two discussion handlers.

pub mod dto;
pub mod error;

pub use error::ApiError;

use std::any::Any;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{debug, error, info, instrument, warn};

use crate::github::{self, GraphQlClient};
use crate::state::AppState;
use dto::{DiscussionListResponse, DiscussionResponse};

/// Page size used when the caller gives none, or an unusable one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page GitHub will serve.
pub const MAX_LIMIT: u32 = 100;

/// Query parameters of the listing endpoint. Kept as raw strings so a
/// malformed `limit` falls back to the default instead of rejecting the request.
#[derive(Debug, Default)]
pub struct ListParams {
    pub limit: Option<String>,
    pub after: Option<String>,
}

impl ListParams {
    /// Build from decoded query pairs; the first occurrence of a key wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "limit" => &mut params.limit,
                "after" => &mut params.after,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/discussions", get(list_discussions))
        .route("/api/discussions/number/", get(missing_discussion_number))
        .route("/api/discussions/number/:number", get(get_discussion_by_number))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Leading decimal integer of `raw`: optional whitespace and sign, then
/// digits; anything after the digits is ignored ("42abc" is 42). Values too
/// large for i64 saturate.
pub fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    let value = match digits.parse::<i64>() {
        Ok(n) => n,
        Err(_) => i64::MAX,
    };
    Some(if negative { -value } else { value })
}

/// Effective page size: default on absent, non-numeric or non-positive
/// input, capped at `MAX_LIMIT`.
pub fn effective_limit(raw: Option<&str>) -> u32 {
    raw.and_then(leading_integer)
        .filter(|n| *n > 0)
        .map(|n| n.min(i64::from(MAX_LIMIT)) as u32)
        .unwrap_or(DEFAULT_LIMIT)
}

/// Parse the path segment naming a discussion.
pub fn parse_discussion_number(raw: &str) -> Result<i32, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::MissingNumber);
    }
    leading_integer(raw)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| ApiError::InvalidNumber(raw.to_string()))
}

fn require_client(state: &AppState) -> Result<&dyn GraphQlClient, ApiError> {
    state.github.as_deref().ok_or(ApiError::MissingToken)
}

fn cached_json<T: Serialize>(state: &AppState, body: T) -> Response {
    ([(header::CACHE_CONTROL, state.cache_control())], Json(body)).into_response()
}

/// GET /api/discussions?limit=&after=
#[instrument(skip_all)]
pub async fn list_discussions(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let params = match query {
        Ok(Query(pairs)) => ListParams::from_pairs(pairs),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "unreadable query string; using defaults");
            ListParams::default()
        }
    };
    debug!(limit = ?params.limit, after = ?params.after, "listing discussions");

    let limit = effective_limit(params.limit.as_deref());
    let after = params.after.as_deref().filter(|s| !s.is_empty());
    let client = require_client(&state)?;

    let Some(category) = github::find_category(client, &state.target)
        .await
        .map_err(ApiError::listing)?
    else {
        info!(slug = %state.target.category_slug, "category not found; returning empty listing");
        return Ok(cached_json(
            &state,
            DiscussionListResponse::category_missing(&state.target.category_slug),
        ));
    };

    let page = github::fetch_discussions(client, &state.target, &category.id, limit, after)
        .await
        .map_err(ApiError::listing)?;

    info!(count = page.nodes.len(), has_next_page = page.page_info.has_next_page, "listed discussions");
    Ok(cached_json(
        &state,
        DiscussionListResponse {
            total: page.nodes.len(),
            discussions: page.nodes,
            page_info: page.page_info,
            category_info: Some(category),
            error: None,
        },
    ))
}

/// GET /api/discussions/number/:number
#[instrument(skip_all)]
pub async fn get_discussion_by_number(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let raw_number = match path {
        Ok(Path(raw)) => raw,
        Err(rejection) => return Err(ApiError::InvalidNumber(rejection.body_text())),
    };
    debug!(number = %raw_number, "fetching discussion");
    let number = parse_discussion_number(&raw_number)?;
    let client = require_client(&state)?;

    let discussion = github::fetch_discussion_by_number(client, &state.target, number)
        .await
        .map_err(ApiError::by_number)?
        .ok_or(ApiError::NotFound(number))?;

    // Same response as a missing discussion, so other categories stay hidden.
    if !discussion.in_category(&state.target.category_slug) {
        info!(number, "discussion outside target category");
        return Err(ApiError::NotFound(number));
    }

    Ok(cached_json(&state, DiscussionResponse { discussion }))
}

/// GET /api/discussions/number/ with the number left out.
pub async fn missing_discussion_number() -> ApiError {
    ApiError::MissingNumber
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(%detail, "handler panicked");
    ApiError::Internal.into_response()
}
