#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::Arc;

use hairtype_detect::application::{
    ports::DetectorPort,
    reducer::ResultReducer,
    services::DetectionService,
};
use hairtype_detect::domain::{
    detection::{ClassNames, Detection},
    errors::{DomainError, DomainResult},
};

pub fn hair_names() -> ClassNames {
    ClassNames::from_list(["coily", "curly", "straight", "wavy"])
}

pub fn region(x: f32, y: f32, class_id: usize, score: f32) -> Detection {
    Detection { x1: x, y1: y, x2: x + 20.0, y2: y + 20.0, score, class_id }
}

/// Detector that always "sees" the same regions and applies the threshold.
pub struct FixedDetector {
    pub regions: Vec<Detection>,
    pub names: ClassNames,
}

impl FixedDetector {
    pub fn new(regions: Vec<Detection>) -> Self {
        Self { regions, names: hair_names() }
    }
}

impl DetectorPort for FixedDetector {
    fn predict(&self, _image: &RgbImage, confidence: f32) -> DomainResult<Vec<Detection>> {
        Ok(self.regions.iter().filter(|d| d.score >= confidence).cloned().collect())
    }

    fn names(&self) -> &ClassNames {
        &self.names
    }
}

pub struct FailingDetector {
    names: ClassNames,
}

impl FailingDetector {
    pub fn new() -> Self {
        Self { names: hair_names() }
    }
}

impl DetectorPort for FailingDetector {
    fn predict(&self, _image: &RgbImage, _confidence: f32) -> DomainResult<Vec<Detection>> {
        Err(DomainError::OperationFailed("session crashed".into()))
    }

    fn names(&self) -> &ClassNames {
        &self.names
    }
}

pub fn service(detector: impl DetectorPort + 'static) -> DetectionService {
    DetectionService::new(Arc::new(detector), ResultReducer::default())
}

pub fn blank_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([30, 30, 30]))
}

pub fn png_bytes(image: &RgbImage) -> Vec<u8> {
    let mut out = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .expect("png encode");
    out
}
