use std::sync::Arc;
use crate::application::services::DetectionService;

/// Shared state for the axum handlers. Holds services only; per-session
/// settings travel with each request or websocket connection.
#[derive(Clone)]
pub struct HttpState {
    /// Upload and camera-frame detection.
    pub detection: Arc<DetectionService>,
}
