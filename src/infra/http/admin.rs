//! Admin write surface: post upserts, category management, and the visual
//! editor conversion endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::application::editor::{blocks_to_html, html_to_blocks};
use crate::domain::blocks::ContentBlock;
use crate::domain::entities::CategoryRecord;
use crate::domain::posts::{ParsedPost, PostDocument};

use super::error::ApiError;
use super::AppState;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/posts", put(upsert_post).get(list_posts))
        .route("/api/admin/posts/{post_id}", axum::routing::delete(delete_post))
        .route(
            "/api/admin/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/api/admin/categories/{slug}",
            axum::routing::delete(delete_category),
        )
        .route("/api/admin/editor/html-to-blocks", post(convert_html))
        .route("/api/admin/editor/blocks-to-html", post(render_blocks))
}

async fn upsert_post(
    State(state): State<AppState>,
    Json(document): Json<PostDocument>,
) -> Result<StatusCode, ApiError> {
    state.posts.upsert_post(document).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.posts.delete_post(&post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<u32>,
    per_page: Option<u32>,
}

#[derive(Debug, Serialize)]
struct PostPage {
    items: Vec<ParsedPost>,
    total: u64,
    page: u32,
    per_page: u32,
}

async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PostPage>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1).saturating_mul(per_page);

    let (items, total) = state.posts.list_all(offset, per_page).await?;
    Ok(Json(PostPage {
        items,
        total,
        page,
        per_page,
    }))
}

async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryRecord>>, ApiError> {
    Ok(Json(state.categories.list().await?))
}

#[derive(Debug, Deserialize)]
struct CreateCategoryPayload {
    slug: Option<String>,
    name: String,
}

async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<(StatusCode, Json<CategoryRecord>), ApiError> {
    let created = state
        .categories
        .create(payload.slug, payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.categories.delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize, Deserialize)]
struct HtmlPayload {
    html: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct BlocksPayload {
    blocks: Vec<ContentBlock>,
}

async fn convert_html(
    Json(payload): Json<HtmlPayload>,
) -> Result<Json<BlocksPayload>, ApiError> {
    let blocks = html_to_blocks(&payload.html)?;
    Ok(Json(BlocksPayload { blocks }))
}

async fn render_blocks(Json(payload): Json<BlocksPayload>) -> Json<HtmlPayload> {
    Json(HtmlPayload {
        html: blocks_to_html(&payload.blocks),
    })
}
