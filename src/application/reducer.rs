use ab_glyph::{FontArc, PxScale};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::Path;

use crate::domain::{
    detection::{palette_color, ClassNames, Detection},
    stream::{distinct_labels, AnnotatedBox},
};

const BORDER_WIDTH: u32 = 2;
const CAPTION_SCALE: f32 = 18.0;
const CAPTION_OFFSET: i32 = 10;

/// Outcome of reducing one frame's detections.
#[derive(Debug, Clone)]
pub enum Reduction {
    /// The detector reported nothing; the image is returned untouched.
    NoDetections { image: RgbImage },
    Detected {
        annotated: RgbImage,
        labels: Vec<String>,
        boxes: Vec<AnnotatedBox>,
    },
}

impl Reduction {
    pub fn is_detected(&self) -> bool {
        matches!(self, Reduction::Detected { .. })
    }

    pub fn image(&self) -> &RgbImage {
        match self {
            Reduction::NoDetections { image } => image,
            Reduction::Detected { annotated, .. } => annotated,
        }
    }

    pub fn into_image(self) -> RgbImage {
        match self {
            Reduction::NoDetections { image } => image,
            Reduction::Detected { annotated, .. } => annotated,
        }
    }

    pub fn labels(&self) -> &[String] {
        match self {
            Reduction::NoDetections { .. } => &[],
            Reduction::Detected { labels, .. } => labels,
        }
    }

    pub fn boxes(&self) -> &[AnnotatedBox] {
        match self {
            Reduction::NoDetections { .. } => &[],
            Reduction::Detected { boxes, .. } => boxes,
        }
    }
}

/// Turns raw detections into an annotated image plus the distinct label list.
#[derive(Clone, Default)]
pub struct ResultReducer {
    font: Option<FontArc>,
}

impl ResultReducer {
    pub fn new(font: Option<FontArc>) -> Self {
        Self { font }
    }

    pub fn load_font(path: &Path) -> Result<FontArc> {
        let data = std::fs::read(path)
            .with_context(|| format!("cannot read font file {}", path.display()))?;
        FontArc::try_from_vec(data)
            .with_context(|| format!("unable to parse font data in {}", path.display()))
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn reduce(&self, mut image: RgbImage, detections: Vec<Detection>, names: &ClassNames) -> Reduction {
        if detections.is_empty() {
            return Reduction::NoDetections { image };
        }

        let labels = distinct_labels(&detections, names);
        let boxes: Vec<AnnotatedBox> = detections
            .into_iter()
            .enumerate()
            .map(|(i, detection)| {
                let label = names.resolve(detection.class_id);
                let caption = format!("{label} {:.2}", detection.score);
                AnnotatedBox { color: palette_color(i), label, caption, detection }
            })
            .collect();

        for annotated in &boxes {
            self.draw(&mut image, annotated);
        }

        Reduction::Detected { annotated: image, labels, boxes }
    }

    fn draw(&self, image: &mut RgbImage, annotated: &AnnotatedBox) {
        let color = Rgb(annotated.color);
        let det = &annotated.detection;
        let (left, top) = (det.x1 as i32, det.y1 as i32);
        let width = (det.width() as u32).max(1);
        let height = (det.height() as u32).max(1);

        for i in 0..BORDER_WIDTH {
            let rect = Rect::at(left - i as i32, top - i as i32).of_size(width + 2 * i, height + 2 * i);
            draw_hollow_rect_mut(image, rect, color);
        }

        if let Some(font) = &self.font {
            let (x, y) = caption_origin(det);
            draw_text_mut(image, color, x, y, PxScale::from(CAPTION_SCALE), font, &annotated.caption);
        }
    }
}

/// Top-left corner of the caption: just above the box, kept inside the frame.
pub fn caption_origin(det: &Detection) -> (i32, i32) {
    let x = (det.x1 as i32).max(0);
    let y = det.y1 as i32 - CAPTION_OFFSET - CAPTION_SCALE as i32;
    (x, y.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> ClassNames {
        ClassNames::from_list(["coily", "curly", "straight", "wavy"])
    }

    fn det(x: f32, y: f32, class_id: usize) -> Detection {
        Detection { x1: x, y1: y, x2: x + 20.0, y2: y + 20.0, score: 0.87, class_id }
    }

    #[test]
    fn empty_input_is_no_detections_and_image_untouched() {
        let image = RgbImage::from_pixel(32, 32, Rgb([7, 7, 7]));
        let out = ResultReducer::default().reduce(image.clone(), vec![], &names());
        assert!(!out.is_detected());
        assert!(out.labels().is_empty());
        assert_eq!(out.image(), &image);
    }

    #[test]
    fn caption_carries_label_and_two_decimal_score() {
        let image = RgbImage::new(100, 100);
        let out = ResultReducer::default().reduce(image, vec![det(40.0, 40.0, 1)], &names());
        assert_eq!(out.boxes()[0].caption, "curly 0.87");
        assert_eq!(out.boxes()[0].color, [0, 255, 0]);
    }

    #[test]
    fn box_outline_uses_palette_color() {
        let image = RgbImage::new(100, 100);
        let out = ResultReducer::default().reduce(image, vec![det(10.0, 10.0, 0), det(50.0, 50.0, 0)], &names());
        let img = out.image();
        assert_eq!(img.get_pixel(10, 10).0, [0, 255, 0]);
        assert_eq!(img.get_pixel(9, 9).0, [0, 255, 0]);
        assert_eq!(img.get_pixel(50, 50).0, [0, 0, 255]);
        // interior left alone
        assert_eq!(img.get_pixel(20, 20).0, [0, 0, 0]);
    }

    #[test]
    fn caption_origin_is_clamped_at_top_edge() {
        assert_eq!(caption_origin(&det(5.0, 3.0, 0)), (5, 0));
        assert_eq!(caption_origin(&det(5.0, 60.0, 0)), (5, 32));
    }
}
