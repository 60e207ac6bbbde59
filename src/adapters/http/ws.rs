use axum::extract::ws::{WebSocketUpgrade, WebSocket, Message};
use axum::extract::State;
use tracing::{info, warn};

use crate::adapters::http::state::HttpState;
use crate::application::dto::CameraControlMessage;
use crate::domain::session::SessionSettings;
use crate::domain::stream::{WsFrameErrorMessage, WsFrameMetaMessage};

pub async fn ws_handler(ws: WebSocketUpgrade, State(st): State<HttpState>) -> impl axum::response::IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, st))
}

/// Frames are handled one at a time, in arrival order. Every frame gets a
/// reply: meta text plus JPEG binary, or a single error text. The threshold
/// lives only as long as this connection.
async fn handle_socket(mut socket: WebSocket, st: HttpState) {
    let mut session = SessionSettings::default();
    info!("Camera client connected (confidence {}%)", session.camera_confidence.percent());

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => match serde_json::from_str::<CameraControlMessage>(&text) {
                Ok(ctrl) => {
                    session = session.with_camera_confidence(ctrl.confidence);
                    info!("Camera confidence set to {}%", ctrl.confidence.percent());
                }
                Err(e) => warn!("Ignoring camera control message: {}", e),
            },
            Message::Binary(frame) => {
                match st
                    .detection
                    .annotate_camera_frame(frame.to_vec(), session.camera_confidence)
                    .await
                {
                    Ok((meta, jpeg)) => {
                        let json = serde_json::to_string(&WsFrameMetaMessage { r#type: "frame".into(), meta }).unwrap_or_default();
                        if socket.send(Message::Text(json.into())).await.is_err() { break; }
                        if socket.send(Message::Binary(jpeg.into())).await.is_err() { break; }
                    }
                    Err(e) => {
                        warn!("Skipping camera frame: {}", e);
                        let json = serde_json::to_string(&WsFrameErrorMessage { r#type: "error".into(), error: e.to_string() }).unwrap_or_default();
                        if socket.send(Message::Text(json.into())).await.is_err() { break; }
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!("Camera client disconnected");
}
