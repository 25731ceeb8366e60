use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{index, upload};
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    let limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}
