//! Public read surface: published posts and related-post recommendations.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::application::error::ErrorReport;
use crate::domain::posts::ParsedPost;

use super::error::ApiError;
use super::AppState;

const DEFAULT_LIST_LIMIT: u32 = 20;
const MAX_LIST_LIMIT: u32 = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health))
        .route("/api/posts/{locale}", get(list_posts))
        .route("/api/posts/{locale}/{slug}", get(get_post))
        .route("/api/posts/{locale}/{slug}/related", get(related_posts))
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<u32>,
}

async fn health(State(state): State<AppState>) -> Response {
    match state.posts.health().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

async fn list_posts(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<ParsedPost>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .min(MAX_LIST_LIMIT);
    let posts = state.posts.list_published(&locale, limit).await?;
    Ok(Json(posts))
}

async fn get_post(
    State(state): State<AppState>,
    Path((locale, slug)): Path<(String, String)>,
) -> Result<Json<ParsedPost>, ApiError> {
    let post = state
        .posts
        .find_published(&locale, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    Ok(Json(post))
}

async fn related_posts(
    State(state): State<AppState>,
    Path((locale, slug)): Path<(String, String)>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<ParsedPost>>, ApiError> {
    let post = state
        .posts
        .find_published(&locale, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let limit = query
        .limit
        .unwrap_or(state.related_limit)
        .min(MAX_LIST_LIMIT);
    let related = state.related.related_to(&post, limit).await?;
    Ok(Json(related))
}
