use clap::Parser;
use std::path::PathBuf;

use crate::domain::{
    detection::ClassNames,
    model::{ModelId, YoloParams},
};

/// Hair type detection server.
#[derive(Debug, Clone, Parser)]
#[command(name = "hairtype-detect", version, about)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    #[arg(long, env = "HAIRTYPE_BIND", default_value = "0.0.0.0:8090")]
    pub bind: String,

    /// ONNX export of the hair type YOLO model
    #[arg(long, env = "HAIRTYPE_MODEL", default_value = "models/hair_yolo.onnx")]
    pub model: String,

    /// Class names in model id order
    #[arg(long, env = "HAIRTYPE_NAMES", value_delimiter = ',', default_value = "coily,curly,straight,wavy")]
    pub names: Vec<String>,

    /// TTF/OTF font for box captions; captions are skipped without one
    #[arg(long, env = "HAIRTYPE_FONT")]
    pub font: Option<PathBuf>,

    /// Square model input size
    #[arg(long, env = "HAIRTYPE_INPUT_SIZE", default_value_t = 640)]
    pub input_size: u32,

    /// IoU threshold for non-maximum suppression
    #[arg(long, env = "HAIRTYPE_IOU", default_value_t = 0.45)]
    pub iou: f32,

    /// Maximum detections kept per image
    #[arg(long, env = "HAIRTYPE_MAX_DET", default_value_t = 100)]
    pub max_det: usize,

    /// Directory with the web front-end
    #[arg(long, env = "HAIRTYPE_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn model_id(&self) -> ModelId {
        let name = std::path::Path::new(&self.model)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "yolo".to_string());
        ModelId { name, onnx_path: self.model.clone() }
    }

    pub fn class_names(&self) -> ClassNames {
        ClassNames::from_list(self.names.iter().map(|n| n.trim().to_string()))
    }

    pub fn yolo_params(&self) -> YoloParams {
        YoloParams {
            input_size: self.input_size,
            iou_threshold: self.iou,
            max_detections: self.max_det,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hair_model() {
        let cfg = AppConfig::parse_from(["hairtype-detect"]);
        assert_eq!(cfg.bind, "0.0.0.0:8090");
        assert_eq!(cfg.class_names().get(2), Some("straight"));
        assert_eq!(cfg.model_id().name, "hair_yolo");
        assert_eq!(cfg.yolo_params().input_size, 640);
    }

    #[test]
    fn names_split_on_commas() {
        let cfg = AppConfig::parse_from(["hairtype-detect", "--names", "straight, wavy,curly,coily"]);
        assert_eq!(cfg.class_names().resolve(1), "wavy");
        assert_eq!(cfg.class_names().len(), 4);
    }
}
