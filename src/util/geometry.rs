// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Two coordinate spaces are in play: canvas pixels (where the pointer is,
//! measured from the top-left of the displayed image) and image pixels
//! (where labels live). A [`Scale`] converts between them.

use serde::{Deserialize, Serialize};

/// A 2D point. Whether it is in canvas or image space depends on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of an image, a viewport or a displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True if the point lies on the displayed area (right/bottom edges excluded).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0.0 && point.x < self.width && point.y >= 0.0 && point.y < self.height
    }

    fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Ratio of displayed canvas size to original image size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Scale {
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    /// Shrink-to-fit scale for showing `image` inside `viewport`.
    ///
    /// Aspect ratio is preserved and the image is never enlarged, so an image
    /// that already fits is shown at 1:1.
    pub fn fit(image: Size, viewport: Size) -> Self {
        if image.is_degenerate() || viewport.is_degenerate() {
            return Self::IDENTITY;
        }
        let factor = (viewport.width / image.width)
            .min(viewport.height / image.height)
            .min(1.0);
        Self { x: factor, y: factor }
    }

    /// Size of `image` once drawn at this scale.
    pub fn display_size(&self, image: Size) -> Size {
        Size::new(image.width * self.x, image.height * self.y)
    }

    /// Canvas pixel position to image pixel position.
    pub fn to_image(&self, canvas: Point) -> Point {
        Point::new(canvas.x / self.x, canvas.y / self.y)
    }

    /// Image pixel position to canvas pixel position.
    pub fn to_canvas(&self, image: Point) -> Point {
        Point::new(image.x * self.x, image.y * self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_fit_wide_image() {
        let scale = Scale::fit(Size::new(2000.0, 1000.0), Size::new(1000.0, 1000.0));
        assert_eq!(scale, Scale { x: 0.5, y: 0.5 });

        let canvas = scale.to_canvas(Point::new(100.0, 100.0));
        assert!(close(canvas, Point::new(50.0, 50.0)));
        assert!(close(scale.to_image(canvas), Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_fit_tall_image_never_exceeds_viewport() {
        let image = Size::new(900.0, 3000.0);
        let viewport = Size::new(1200.0, 800.0);
        let scale = Scale::fit(image, viewport);
        let shown = scale.display_size(image);

        assert!(shown.width <= viewport.width + 1e-9);
        assert!(shown.height <= viewport.height + 1e-9);
        assert!((shown.height - viewport.height).abs() < 1e-9);
        assert!((shown.width / shown.height - image.width / image.height).abs() < 1e-9);
    }

    #[test]
    fn test_small_image_is_not_upscaled() {
        let scale = Scale::fit(Size::new(300.0, 200.0), Size::new(1000.0, 1000.0));
        assert_eq!(scale, Scale::IDENTITY);
    }

    #[test]
    fn test_degenerate_sizes_use_identity() {
        assert_eq!(Scale::fit(Size::new(0.0, 100.0), Size::new(500.0, 500.0)), Scale::IDENTITY);
        assert_eq!(Scale::fit(Size::new(100.0, 100.0), Size::new(0.0, 0.0)), Scale::IDENTITY);
    }

    #[test]
    fn test_canvas_image_roundtrip() {
        let cases = [
            (Size::new(4000.0, 6000.0), Size::new(800.0, 800.0)),
            (Size::new(640.0, 480.0), Size::new(800.0, 800.0)),
            (Size::new(1234.0, 777.0), Size::new(613.0, 402.0)),
        ];
        for (image, viewport) in cases {
            let scale = Scale::fit(image, viewport);
            for p in [Point::new(0.0, 0.0), Point::new(17.3, 401.9), Point::new(333.0, 2.5)] {
                assert!(close(scale.to_canvas(scale.to_image(p)), p));
            }
        }
    }

    #[test]
    fn test_display_contains() {
        let shown = Size::new(500.0, 250.0);
        assert!(shown.contains(Point::new(0.0, 0.0)));
        assert!(shown.contains(Point::new(499.9, 249.9)));
        assert!(!shown.contains(Point::new(500.0, 10.0)));
        assert!(!shown.contains(Point::new(10.0, -0.1)));
    }
}
