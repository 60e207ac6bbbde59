use base64::{prelude::BASE64_STANDARD, Engine};
use image::{codecs::jpeg::JpegEncoder, ExtendedColorType, RgbImage};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::{
    application::{
        dto::{ConfigResponse, DetectResponse, HaircareCard, NO_DETECTION_NOTICE},
        ports::{DetectorPort, ModelCatalogPort},
        reducer::{Reduction, ResultReducer},
    },
    domain::{
        detection::ClassNames,
        errors::{DomainError, DomainResult},
        model::ModelId,
        stream::FrameMeta,
        threshold::ConfidenceThreshold,
    },
};

const JPEG_QUALITY: u8 = 80;

/// One processed image: the reducer outcome plus timing.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub reduction: Reduction,
    pub threshold: ConfidenceThreshold,
    pub infer_ms: f32,
}

impl FrameReport {
    pub fn meta(&self) -> FrameMeta {
        let image = self.reduction.image();
        FrameMeta {
            width: image.width(),
            height: image.height(),
            infer_ms: self.infer_ms,
            confidence: self.threshold.percent(),
            detection_count: self.reduction.boxes().len(),
            labels: self.reduction.labels().to_vec(),
            boxes: self.reduction.boxes().to_vec(),
        }
    }
}

/// Runs the detector and the reducer for uploads and camera frames.
#[derive(Clone)]
pub struct DetectionService {
    detector: Arc<dyn DetectorPort>,
    reducer: ResultReducer,
}

impl DetectionService {
    pub fn new(detector: Arc<dyn DetectorPort>, reducer: ResultReducer) -> Self {
        Self { detector, reducer }
    }

    pub fn names(&self) -> &ClassNames {
        self.detector.names()
    }

    pub fn config(&self) -> ConfigResponse {
        ConfigResponse {
            confidence_default: ConfidenceThreshold::DEFAULT_PERCENT,
            confidence_min: ConfidenceThreshold::MIN_PERCENT,
            confidence_max: ConfidenceThreshold::MAX_PERCENT,
            class_names: self.names().iter().map(|(_, name)| name.to_string()).collect(),
            captions_enabled: self.reducer.has_font(),
        }
    }

    /// Stateless per-frame transform: predict, then annotate. Nothing is kept
    /// between calls.
    pub fn process_frame(&self, frame: RgbImage, threshold: ConfidenceThreshold) -> DomainResult<FrameReport> {
        let started = Instant::now();
        let detections = self.detector.predict(&frame, threshold.as_fraction())?;
        let infer_ms = started.elapsed().as_secs_f32() * 1000.0;

        let reduction = self.reducer.reduce(frame, detections, self.names());
        debug!(
            "frame reduced: {} boxes, labels {:?}, {:.1} ms",
            reduction.boxes().len(),
            reduction.labels(),
            infer_ms
        );
        Ok(FrameReport { reduction, threshold, infer_ms })
    }

    /// Upload path: decode, detect, annotate and build one card per distinct label.
    pub async fn analyze_upload(&self, bytes: Vec<u8>, threshold: ConfidenceThreshold) -> DomainResult<DetectResponse> {
        let svc = self.clone();
        let (report, jpeg) = run_blocking(move || {
            let image = decode_image(&bytes)?;
            let report = svc.process_frame(image, threshold)?;
            let jpeg = encode_jpeg(report.reduction.image())?;
            Ok((report, jpeg))
        })
        .await?;

        let meta = report.meta();
        let detected = report.reduction.is_detected();
        Ok(DetectResponse {
            detected,
            notice: (!detected).then(|| NO_DETECTION_NOTICE.to_string()),
            confidence: meta.confidence,
            detection_count: meta.detection_count,
            cards: meta.labels.iter().map(|label| HaircareCard::for_label(label)).collect(),
            labels: meta.labels,
            boxes: meta.boxes,
            width: meta.width,
            height: meta.height,
            infer_ms: meta.infer_ms,
            annotated_jpeg: BASE64_STANDARD.encode(jpeg),
        })
    }

    /// Camera path: one encoded frame in, metadata plus annotated JPEG out.
    pub async fn annotate_camera_frame(
        &self,
        bytes: Vec<u8>,
        threshold: ConfidenceThreshold,
    ) -> DomainResult<(FrameMeta, Vec<u8>)> {
        let svc = self.clone();
        run_blocking(move || {
            let frame = decode_image(&bytes)?;
            let report = svc.process_frame(frame, threshold)?;
            let jpeg = encode_jpeg(report.reduction.image())?;
            Ok((report.meta(), jpeg))
        })
        .await
    }
}

/// Validates the model file before the engine is built.
#[derive(Clone)]
pub struct ModelService {
    catalog: Arc<dyn ModelCatalogPort>,
}

impl ModelService {
    pub fn new(catalog: Arc<dyn ModelCatalogPort>) -> Self {
        Self { catalog }
    }

    pub async fn validate(&self, model: &ModelId) -> DomainResult<()> {
        self.catalog.validate_model(model).await
    }
}

async fn run_blocking<T, F>(job: F) -> DomainResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> DomainResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| DomainError::OperationFailed(format!("inference task failed: {e}")))?
}

pub fn decode_image(bytes: &[u8]) -> DomainResult<RgbImage> {
    if bytes.is_empty() {
        return Err(DomainError::InvalidInput("empty image".into()));
    }
    image::load_from_memory(bytes)
        .map(|img| img.to_rgb8())
        .map_err(|e| DomainError::InvalidInput(format!("cannot decode image: {e}")))
}

pub fn encode_jpeg(image: &RgbImage) -> DomainResult<Vec<u8>> {
    let mut jpeg = Vec::new();
    let mut enc = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    enc.encode(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgb8)
        .map_err(|e| DomainError::OperationFailed(format!("cannot encode jpeg: {e}")))?;
    Ok(jpeg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode_image(b"not an image"), Err(DomainError::InvalidInput(_))));
        assert!(matches!(decode_image(&[]), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn png_roundtrips_through_decode_and_jpeg_keeps_size() {
        let img = RgbImage::from_pixel(24, 16, Rgb([200, 10, 10]));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).unwrap();

        let decoded = decode_image(&png).unwrap();
        assert_eq!(decoded, img);

        let jpeg = encode_jpeg(&decoded).unwrap();
        let back = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!((back.width(), back.height()), (24, 16));
    }
}
