use serde::{Deserialize, Serialize};

use crate::domain::{
    haircare::{self, HaircareEntry},
    stream::AnnotatedBox,
    threshold::ConfidenceThreshold,
};

pub const NO_DETECTION_NOTICE: &str = "No hair detected. Try lowering the confidence.";

/// One text panel per distinct detected label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaircareCard {
    pub label: String,
    pub title: String,
    pub description: String,
    pub care: String,
    pub video_embed_url: Option<String>,
}

impl HaircareCard {
    pub fn for_label(label: &str) -> Self {
        let entry = haircare::lookup(label);
        Self {
            label: label.to_string(),
            title: format!("Type: {}", capitalize(label)),
            description: entry.description.to_string(),
            care: entry.care.to_string(),
            video_embed_url: haircare::video_embed_url(label),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    pub detected: bool,
    pub notice: Option<String>,
    pub confidence: u8,
    /// Boxes drawn, one per raw detection.
    pub detection_count: usize,
    /// Distinct labels; one card each, so this can be shorter than `detection_count`.
    pub labels: Vec<String>,
    pub cards: Vec<HaircareCard>,
    pub boxes: Vec<AnnotatedBox>,
    pub width: u32,
    pub height: u32,
    pub infer_ms: f32,
    /// Base64 JPEG of the annotated image.
    pub annotated_jpeg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaircareLookupResponse {
    pub label: String,
    pub available: bool,
    pub description: String,
    pub care: String,
    pub video_embed_url: Option<String>,
}

impl HaircareLookupResponse {
    pub fn for_label(label: &str) -> Self {
        let entry: &HaircareEntry = haircare::lookup(label);
        Self {
            label: label.to_string(),
            available: entry.is_available(),
            description: entry.description.to_string(),
            care: entry.care.to_string(),
            video_embed_url: haircare::video_embed_url(label),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub confidence_default: u8,
    pub confidence_min: u8,
    pub confidence_max: u8,
    pub class_names: Vec<String>,
    pub captions_enabled: bool,
}

/// Text message a camera client sends to change its own threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraControlMessage {
    pub confidence: ConfidenceThreshold,
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_title_is_capitalized() {
        assert_eq!(HaircareCard::for_label("cURLY").title, "Type: Curly");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn unknown_label_card_uses_fallback_text() {
        let card = HaircareCard::for_label("frizzy");
        assert_eq!(card.description, HaircareEntry::NOT_AVAILABLE);
        assert_eq!(card.care, HaircareEntry::NOT_AVAILABLE);
        assert!(card.video_embed_url.is_none());
    }

    #[test]
    fn control_message_rejects_out_of_range() {
        let ok: CameraControlMessage = serde_json::from_str(r#"{"confidence":25}"#).unwrap();
        assert_eq!(ok.confidence.percent(), 25);
        assert!(serde_json::from_str::<CameraControlMessage>(r#"{"confidence":0}"#).is_err());
    }
}
