mod admin;
pub mod error;
mod middleware;
mod public;

pub use error::ApiError;

use axum::Router;

use crate::application::categories::CategoryService;
use crate::application::posts::PostService;
use crate::application::related::RelatedPostsService;

#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub related: RelatedPostsService,
    pub categories: CategoryService,
    pub related_limit: u32,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(public::router())
        .merge(admin::router())
        .layer(axum::middleware::from_fn(middleware::log_responses))
        .layer(axum::middleware::from_fn(middleware::set_request_context))
        .with_state(state)
}
