use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One region reported by the detector, in source-image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
    pub class_id: usize,
}

impl Detection {
    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn iou(&self, other: &Detection) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 { 0.0 } else { inter / union }
    }
}

/// Class id to label table exposed by a detection provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassNames(BTreeMap<usize, String>);

impl ClassNames {
    pub fn new(names: BTreeMap<usize, String>) -> Self {
        Self(names)
    }

    /// Ids are assigned by position, as in a YOLO `names` list.
    pub fn from_list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).enumerate().collect())
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.0.get(&class_id).map(String::as_str)
    }

    /// Ids the table does not know about resolve to `class_<id>`.
    pub fn resolve(&self, class_id: usize) -> String {
        self.get(class_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("class_{class_id}"))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

/// Box colours, RGB. Indexed by position in the raw detection list.
pub const PALETTE: [[u8; 3]; 8] = [
    [0, 255, 0],
    [0, 0, 255],
    [255, 0, 0],
    [255, 255, 0],
    [255, 0, 255],
    [0, 255, 255],
    [128, 128, 128],
    [255, 128, 0],
];

pub fn palette_color(index: usize) -> [u8; 3] {
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x1: f32, y1: f32, x2: f32, y2: f32) -> Detection {
        Detection { x1, y1, x2, y2, score: 0.9, class_id: 0 }
    }

    #[test]
    fn palette_wraps_every_eight() {
        assert_eq!(palette_color(8), palette_color(0));
        assert_eq!(palette_color(15), palette_color(7));
        assert_ne!(palette_color(1), palette_color(0));
    }

    #[test]
    fn unknown_ids_get_placeholder_label() {
        let names = ClassNames::from_list(["coily", "curly"]);
        assert_eq!(names.resolve(1), "curly");
        assert_eq!(names.resolve(7), "class_7");
    }

    #[test]
    fn iou_of_disjoint_and_identical_boxes() {
        let a = det(0.0, 0.0, 10.0, 10.0);
        let b = det(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }
}
