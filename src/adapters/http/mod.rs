pub mod error;
pub mod routes;
pub mod state;
pub mod ws;

use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};
use crate::adapters::http::state::HttpState;
use crate::adapters::http::ws::ws_handler;

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/config", get(routes::get_config))
        .route("/api/detect", post(routes::detect_upload))
        .route("/api/haircare", get(routes::list_profiles))
        .route("/api/haircare/:label", get(routes::lookup_haircare))
        .route("/ws/camera", get(ws_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
