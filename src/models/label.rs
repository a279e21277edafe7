// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label data structures.
//!
//! A label is a rectangular region of a sheet image with a classification,
//! a detector confidence and (after OCR) its text. Coordinates are always
//! image pixels.

use crate::util::geometry::{Point, Scale};
use serde::{Deserialize, Serialize};

/// Classification of a label.
///
/// The finder reports `Typewritten` for printed labels. Anything else it
/// (or the OCR service) sends, including handwritten or unknown, is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LabelType {
    Typewritten,
    Other,
}

impl LabelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelType::Typewritten => "Typewritten",
            LabelType::Other => "Other",
        }
    }
}

impl From<String> for LabelType {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("typewritten") {
            LabelType::Typewritten
        } else {
            LabelType::Other
        }
    }
}

impl From<LabelType> for String {
    fn from(value: LabelType) -> Self {
        value.as_str().to_string()
    }
}

/// A label box on the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(rename = "type")]
    pub label_type: LabelType,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    #[serde(rename = "conf", default)]
    pub confidence: f64,
    #[serde(default)]
    pub text: String,
}

impl Label {
    /// Create a label with no text.
    pub fn new(
        label_type: LabelType,
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
        confidence: f64,
    ) -> Self {
        Self {
            label_type,
            left,
            top,
            right,
            bottom,
            confidence,
            text: String::new(),
        }
    }

    /// Inclusive containment test for a point in image coordinates.
    pub fn contains(&self, point: Point) -> bool {
        self.left <= point.x && point.x <= self.right && self.top <= point.y && point.y <= self.bottom
    }

    /// Hit-test a canvas position shown at `scale`.
    pub fn hit(&self, canvas: Point, scale: Scale) -> bool {
        self.contains(scale.to_image(canvas))
    }

    /// One-line description for the properties panel.
    pub fn info(&self) -> String {
        let conf = if self.confidence > 0.0 {
            format!("conf {:.2}, ", self.confidence)
        } else {
            String::new()
        };
        format!(
            "type: {}, {}x: {}, y: {}",
            self.label_type.as_str(),
            conf,
            self.left.round(),
            self.top.round()
        )
    }

    /// Integer crop rectangle `(x, y, width, height)` clamped to an image of
    /// the given size. `None` when nothing of the label lies on the image.
    pub fn crop_rect(&self, image_width: u32, image_height: u32) -> Option<(u32, u32, u32, u32)> {
        let clamp = |v: f64, max: u32| v.round().clamp(0.0, max as f64) as u32;
        let left = clamp(self.left.min(self.right), image_width);
        let right = clamp(self.left.max(self.right), image_width);
        let top = clamp(self.top.min(self.bottom), image_height);
        let bottom = clamp(self.top.max(self.bottom), image_height);

        if right > left && bottom > top {
            Some((left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Label {
        Label::new(LabelType::Typewritten, 100.0, 200.0, 300.0, 260.0, 0.9)
    }

    #[test]
    fn test_contains_inside_and_boundaries() {
        let label = sample();
        assert!(label.contains(Point::new(150.0, 230.0)));
        assert!(label.contains(Point::new(100.0, 200.0)));
        assert!(label.contains(Point::new(300.0, 260.0)));
        assert!(label.contains(Point::new(100.0, 260.0)));
    }

    #[test]
    fn test_contains_outside_each_edge() {
        let label = sample();
        assert!(!label.contains(Point::new(99.9, 230.0)));
        assert!(!label.contains(Point::new(300.1, 230.0)));
        assert!(!label.contains(Point::new(150.0, 199.9)));
        assert!(!label.contains(Point::new(150.0, 260.1)));
    }

    #[test]
    fn test_hit_converts_canvas_position() {
        let label = sample();
        let half = Scale { x: 0.5, y: 0.5 };
        // (60, 110) on canvas is (120, 220) on the image
        assert!(label.hit(Point::new(60.0, 110.0), half));
        // (120, 220) on canvas is (240, 440) on the image
        assert!(!label.hit(Point::new(120.0, 220.0), half));
    }

    #[test]
    fn test_deserialize_server_label() {
        let json = r#"{"type": "Typewritten", "left": 10, "top": 20, "right": 110, "bottom": 70, "conf": 0.87}"#;
        let label: Label = serde_json::from_str(json).unwrap();
        assert_eq!(label.label_type, LabelType::Typewritten);
        assert_eq!(label.right, 110.0);
        assert_eq!(label.confidence, 0.87);
        assert!(label.text.is_empty());
    }

    #[test]
    fn test_unknown_types_read_as_other() {
        for name in ["Handwritten", "unknown", "Barcode"] {
            let json = format!(r#"{{"type": "{}", "left": 0, "top": 0, "right": 1, "bottom": 1}}"#, name);
            let label: Label = serde_json::from_str(&json).unwrap();
            assert_eq!(label.label_type, LabelType::Other);
        }
        let lower: LabelType = serde_json::from_str(r#""typewritten""#).unwrap();
        assert_eq!(lower, LabelType::Typewritten);
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["type"], "Typewritten");
        assert_eq!(value["conf"], 0.9);
        assert_eq!(value["text"], "");
    }

    #[test]
    fn test_crop_rect_is_clamped() {
        let label = Label::new(LabelType::Other, -5.0, 10.4, 50.0, 120.0, 0.0);
        assert_eq!(label.crop_rect(40, 100), Some((0, 10, 40, 90)));

        let off_image = Label::new(LabelType::Other, 500.0, 500.0, 600.0, 600.0, 0.0);
        assert_eq!(off_image.crop_rect(40, 100), None);
    }

    #[test]
    fn test_info_line() {
        assert_eq!(sample().info(), "type: Typewritten, conf 0.90, x: 100, y: 200");
        let drawn = Label::new(LabelType::Other, 1.4, 2.6, 30.0, 30.0, 0.0);
        assert_eq!(drawn.info(), "type: Other, x: 1, y: 3");
    }
}
