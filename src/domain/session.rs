use serde::{Deserialize, Serialize};

use super::threshold::ConfidenceThreshold;

/// Per-session detection settings. Every upload request and camera connection
/// owns its own copy; the selected page is kept client-side in the URL hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default)]
    pub upload_confidence: ConfidenceThreshold,
    #[serde(default)]
    pub camera_confidence: ConfidenceThreshold,
}

impl SessionSettings {
    pub fn with_upload_confidence(mut self, threshold: ConfidenceThreshold) -> Self {
        self.upload_confidence = threshold;
        self
    }

    pub fn with_camera_confidence(mut self, threshold: ConfidenceThreshold) -> Self {
        self.camera_confidence = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_independent() {
        let s = SessionSettings::default()
            .with_camera_confidence(ConfidenceThreshold::from_percent(20).unwrap());
        assert_eq!(s.upload_confidence.percent(), 50);
        assert_eq!(s.camera_confidence.percent(), 20);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: SessionSettings = serde_json::from_str(r#"{"camera_confidence":30}"#).unwrap();
        assert_eq!(s.upload_confidence, ConfidenceThreshold::default());
        assert_eq!(s.camera_confidence.percent(), 30);
    }
}
