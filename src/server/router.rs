use axum::{extract::DefaultBodyLimit, routing::post, Router};

use super::{handlers, state::AppState};

/// Uploaded track lists can exceed axum's 2 MB default.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/run", post(handlers::run_download))
        .route("/search", post(handlers::search))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
