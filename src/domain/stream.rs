use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::detection::{ClassNames, Detection};

/// A detection as drawn on the annotated frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedBox {
    #[serde(flatten)]
    pub detection: Detection,
    pub label: String,
    pub color: [u8; 3],
    pub caption: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameMeta {
    pub width: u32,
    pub height: u32,
    pub infer_ms: f32,
    pub confidence: u8,
    pub detection_count: usize,
    pub labels: Vec<String>,
    pub boxes: Vec<AnnotatedBox>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsFrameMetaMessage {
    pub r#type: String,
    pub meta: FrameMeta,
}

/// Reply for a camera frame that could not be processed. The client may send
/// its next frame as soon as this arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsFrameErrorMessage {
    pub r#type: String,
    pub error: String,
}

/// Labels present in `detections`, without repeats, in first-seen order.
pub fn distinct_labels(detections: &[Detection], names: &ClassNames) -> Vec<String> {
    let mut seen = HashSet::new();
    detections
        .iter()
        .map(|det| names.resolve(det.class_id))
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(class_id: usize, score: f32) -> Detection {
        Detection { x1: 0.0, y1: 0.0, x2: 1.0, y2: 1.0, score, class_id }
    }

    #[test]
    fn order_follows_first_occurrence_not_score() {
        let names = ClassNames::from_list(["coily", "curly", "straight", "wavy"]);
        let dets = vec![det(3, 0.2), det(0, 0.9), det(3, 0.95), det(2, 0.5)];
        assert_eq!(distinct_labels(&dets, &names), vec!["wavy", "coily", "straight"]);
    }

    #[test]
    fn ids_sharing_a_name_collapse() {
        let names = ClassNames::from_list(["curly", "curly"]);
        assert_eq!(distinct_labels(&[det(0, 0.5), det(1, 0.5)], &names), vec!["curly"]);
    }
}
