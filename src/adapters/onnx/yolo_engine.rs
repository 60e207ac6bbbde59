use anyhow::{bail, Context, Result};
use image::{imageops::FilterType, RgbImage};
use ndarray::{s, Array4, ArrayViewD, Axis, IxDyn};
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::Session;
use ort::value::Value;
use std::fs;
use std::sync::Mutex;
use tracing::info;

use crate::application::ports::DetectorPort;
use crate::domain::detection::{ClassNames, Detection};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{ModelId, YoloParams};

/// YOLOv8/11 detector exported to ONNX (output `[1, 4 + nc, N]`).
pub struct OnnxYoloEngine {
    session: Mutex<Session>,
    names: ClassNames,
    params: YoloParams,
}

impl OnnxYoloEngine {
    pub fn load(model: &ModelId, names: ClassNames, params: YoloParams) -> Result<Self> {
        let mut builder = Session::builder()?.with_intra_threads(4)?;

        // CUDA is optional: registered when available, CPU otherwise.
        let cuda = CUDAExecutionProvider::default().build();
        if let Ok(builder_with_cuda) = builder.clone().with_execution_providers([cuda]) {
            builder = builder_with_cuda;
        }

        let model_bytes = fs::read(&model.onnx_path)
            .with_context(|| format!("cannot read model {}", model.onnx_path))?;
        let session = builder.commit_from_memory(&model_bytes)?;

        info!(
            "Model {} loaded ({} classes, imgsz {})",
            model.name,
            names.len(),
            params.input_size
        );
        Ok(Self { session: Mutex::new(session), names, params })
    }

    fn infer(&self, rgb: &RgbImage, confidence: f32) -> Result<Vec<Detection>> {
        let imgsz = self.params.input_size as usize;
        let resized = image::imageops::resize(rgb, imgsz as u32, imgsz as u32, FilterType::Triangle);

        let mut input = Array4::<f32>::zeros((1, 3, imgsz, imgsz));
        for (x, y, pixel) in resized.enumerate_pixels() {
            input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
            input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
            input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
        }

        let input_shape = vec![1, 3, imgsz as i64, imgsz as i64];
        let (raw, _) = input.into_raw_vec_and_offset();
        let input_tensor = Value::from_array((input_shape, raw))?;

        // Copy the output out so the session lock is released before parsing.
        let (dims, data) = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| anyhow::anyhow!("onnx session lock poisoned"))?;
            let outputs = session.run(ort::inputs![input_tensor])?;
            let (shape_out, data_out) = outputs[0].try_extract_tensor::<f32>()?;
            let dims: Vec<usize> = shape_out.iter().map(|&x| x.max(0) as usize).collect();
            (dims, data_out.to_vec())
        };

        let candidates = decode_predictions(&dims, &data, rgb.dimensions(), self.params.input_size, confidence)?;
        Ok(non_max_suppression(candidates, self.params.iou_threshold, self.params.max_detections))
    }
}

/// Parses a `[1, 4 + nc, N]` output into detections scaled to `frame`
/// (width, height). Candidates scoring below `confidence` are dropped.
pub fn decode_predictions(
    dims: &[usize],
    data: &[f32],
    frame: (u32, u32),
    input_size: u32,
    confidence: f32,
) -> Result<Vec<Detection>> {
    if dims.len() != 3 || dims[0] < 1 || dims[1] < 5 {
        bail!("unexpected model output shape {dims:?}, expected [1, 4 + classes, candidates]");
    }
    let array_view = ArrayViewD::from_shape(IxDyn(dims), data)?;
    let view = array_view.index_axis(Axis(0), 0);

    let (width, height) = (frame.0 as f32, frame.1 as f32);
    let sx = width / input_size as f32;
    let sy = height / input_size as f32;

    let mut candidates = Vec::new();
    for i in 0..dims[2] {
        let scores = view.slice(s![4.., i]);
        let Some((class_id, &max_score)) = scores
            .indexed_iter()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
        else {
            continue;
        };

        if max_score >= confidence {
            let cx = view[[0, i]];
            let cy = view[[1, i]];
            let w = view[[2, i]];
            let h = view[[3, i]];

            candidates.push(Detection {
                x1: ((cx - w / 2.0) * sx).max(0.0),
                y1: ((cy - h / 2.0) * sy).max(0.0),
                x2: ((cx + w / 2.0) * sx).min(width),
                y2: ((cy + h / 2.0) * sy).min(height),
                score: max_score,
                class_id,
            });
        }
    }
    Ok(candidates)
}

impl DetectorPort for OnnxYoloEngine {
    fn predict(&self, image: &RgbImage, confidence: f32) -> DomainResult<Vec<Detection>> {
        self.infer(image, confidence)
            .map_err(|e| DomainError::OperationFailed(format!("inference failed: {e:#}")))
    }

    fn names(&self) -> &ClassNames {
        &self.names
    }
}

/// Class-wise NMS. Output is sorted by descending score and capped at `max_det`.
pub fn non_max_suppression(mut candidates: Vec<Detection>, iou_threshold: f32, max_det: usize) -> Vec<Detection> {
    candidates.sort_unstable_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<Detection> = Vec::new();
    for det in candidates {
        if kept.len() >= max_det {
            break;
        }
        let overlaps = kept
            .iter()
            .any(|k| k.class_id == det.class_id && k.iou(&det) > iou_threshold);
        if !overlaps {
            kept.push(det);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x: f32, score: f32, class_id: usize) -> Detection {
        Detection { x1: x, y1: 0.0, x2: x + 10.0, y2: 10.0, score, class_id }
    }

    #[test]
    fn decode_scales_boxes_and_applies_threshold() {
        // [1, 6, 2]: cx, cy, w, h, score(class 0), score(class 1) per candidate
        let data: [f32; 12] = [
            50.0, 10.0,
            50.0, 10.0,
            20.0, 5.0,
            20.0, 5.0,
            0.9, 0.05,
            0.1, 0.2,
        ];
        let out = decode_predictions(&[1, 6, 2], &data, (200, 100), 100, 0.5).unwrap();
        assert_eq!(out, vec![Detection { x1: 80.0, y1: 40.0, x2: 120.0, y2: 60.0, score: 0.9, class_id: 0 }]);
    }

    #[test]
    fn decode_rejects_malformed_output_without_panicking() {
        assert!(decode_predictions(&[1, 4, 3], &[0.0; 12], (64, 64), 64, 0.5).is_err());
        assert!(decode_predictions(&[6, 2], &[0.0; 12], (64, 64), 64, 0.5).is_err());
        assert!(decode_predictions(&[0, 6, 2], &[], (64, 64), 64, 0.5).is_err());
        // length disagrees with the declared shape
        assert!(decode_predictions(&[1, 6, 2], &[0.0; 5], (64, 64), 64, 0.5).is_err());
    }

    #[test]
    fn nms_drops_overlapping_same_class() {
        let out = non_max_suppression(vec![det(0.0, 0.6, 0), det(1.0, 0.9, 0), det(50.0, 0.7, 0)], 0.45, 100);
        let scores: Vec<f32> = out.iter().map(|d| d.score).collect();
        assert_eq!(scores, vec![0.9, 0.7]);
    }

    #[test]
    fn nms_keeps_overlapping_other_class_and_caps() {
        let out = non_max_suppression(vec![det(0.0, 0.9, 0), det(0.0, 0.8, 1), det(40.0, 0.7, 2)], 0.45, 2);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].class_id, 1);
    }
}
