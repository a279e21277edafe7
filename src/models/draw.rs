// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rubber-band rectangle tool for drawing new labels.
//!
//! Pointer positions are recorded in canvas pixels and only converted to
//! image pixels when the box is committed.

use super::label::{Label, LabelType};
use crate::util::geometry::{Point, Scale};
use thiserror::Error;

/// Why a drawn box did not become a label.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawError {
    #[error("The new label is too small. width = {width} < {limit} or height = {height} < {limit}")]
    TooSmall { width: f64, height: f64, limit: f64 },

    #[error("No label is being drawn")]
    NotDrawing,
}

/// Idle or drawing, with the endpoints of the current rectangle.
#[derive(Debug, Clone, Default)]
pub struct DrawState {
    drawing: bool,
    start: Point,
    end: Point,
}

impl DrawState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Enter the drawing state anchored at `pos`.
    pub fn begin(&mut self, pos: Point) {
        self.drawing = true;
        self.start = pos;
        self.end = pos;
    }

    /// Track the pointer. Returns false when idle.
    pub fn update(&mut self, pos: Point) -> bool {
        if self.drawing {
            self.end = pos;
        }
        self.drawing
    }

    /// On-canvas width and height of the rectangle.
    pub fn size(&self) -> (f64, f64) {
        ((self.end.x - self.start.x).abs(), (self.end.y - self.start.y).abs())
    }

    /// Normalized `(min, max)` corners of the live rectangle, canvas space.
    pub fn rect(&self) -> Option<(Point, Point)> {
        if !self.drawing {
            return None;
        }
        let min = Point::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y));
        let max = Point::new(self.start.x.max(self.end.x), self.start.y.max(self.end.y));
        Some((min, max))
    }

    /// Commit the rectangle ending at `pos`.
    ///
    /// The box is rejected if either side is shorter than `min_size` canvas
    /// pixels. The state is idle afterwards whatever the outcome.
    pub fn finish(&mut self, pos: Point, scale: Scale, min_size: f64) -> Result<Label, DrawError> {
        if !self.update(pos) {
            return Err(DrawError::NotDrawing);
        }
        let result = self.to_label(scale, min_size);
        self.reset();
        result
    }

    fn to_label(&self, scale: Scale, min_size: f64) -> Result<Label, DrawError> {
        let (width, height) = self.size();
        if width < min_size || height < min_size {
            return Err(DrawError::TooSmall {
                width,
                height,
                limit: min_size,
            });
        }
        let (min, max) = self.rect().ok_or(DrawError::NotDrawing)?;
        let top_left = scale.to_image(min);
        let bottom_right = scale.to_image(max);
        Ok(Label::new(
            LabelType::Typewritten,
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y,
            1.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_commits_label_in_image_space() {
        let mut draw = DrawState::new();
        draw.begin(Point::new(120.0, 80.0));
        assert!(draw.is_drawing());
        assert!(draw.update(Point::new(60.0, 90.0)));

        // Dragged up-left from the start point
        let label = draw
            .finish(Point::new(20.0, 30.0), Scale { x: 0.5, y: 0.25 }, 20.0)
            .unwrap();
        assert_eq!(label.left, 40.0);
        assert_eq!(label.right, 240.0);
        assert_eq!(label.top, 120.0);
        assert_eq!(label.bottom, 320.0);
        assert!(!draw.is_drawing());
    }

    #[test]
    fn test_small_box_is_rejected() {
        let mut draw = DrawState::new();
        draw.begin(Point::new(10.0, 10.0));
        let err = draw
            .finish(Point::new(100.0, 25.0), Scale::IDENTITY, 20.0)
            .unwrap_err();
        assert_eq!(
            err,
            DrawError::TooSmall {
                width: 90.0,
                height: 15.0,
                limit: 20.0
            }
        );
        assert!(!draw.is_drawing());
    }

    #[test]
    fn test_threshold_uses_canvas_size() {
        // 30 canvas px is 300 image px at 0.1 scale, still accepted
        let mut draw = DrawState::new();
        draw.begin(Point::new(0.0, 0.0));
        let label = draw.finish(Point::new(30.0, 30.0), Scale { x: 0.1, y: 0.1 }, 20.0).unwrap();
        assert!((label.right - label.left - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_finish_while_idle() {
        let mut draw = DrawState::new();
        assert!(!draw.update(Point::new(5.0, 5.0)));
        assert_eq!(
            draw.finish(Point::new(50.0, 50.0), Scale::IDENTITY, 20.0),
            Err(DrawError::NotDrawing)
        );
        assert!(draw.rect().is_none());
    }
}
