use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelId {
    pub name: String,       // logical name, e.g. "hair_yolo"
    pub onnx_path: String,  // filesystem path
}

/// Engine settings fixed at start-up. The confidence threshold is not here;
/// it travels with every predict call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoloParams {
    pub input_size: u32,        // 640 typical
    pub iou_threshold: f32,     // 0..1
    pub max_detections: usize,  // e.g. 100
}

impl Default for YoloParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            iou_threshold: 0.45,
            max_detections: 100,
        }
    }
}
