use super::handlers::{admin, avatar};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/admin/sweep", post(admin::run_sweep))
        .route("/api/admin/posts/:post_id/watermark", get(admin::get_watermark))
        .route("/api/comments/:comment_id/avatar", get(avatar::get_avatar))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
