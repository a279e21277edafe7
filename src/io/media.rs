// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sheet image loading.
//!
//! Images are decoded to RGBA8 once. The full-size buffer is kept for
//! cropping label images on export; the same pixels feed the egui texture.

use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::Path;

/// File extensions offered in the open dialog.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif"];

/// A decoded sheet image.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub image: RgbaImage,
}

impl LoadedImage {
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// Decode an image file to RGBA8.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let decoded = image::open(path)
        .with_context(|| format!("Could not open image '{}'", path.display()))?;
    let image = decoded.to_rgba8();
    let (width, height) = image.dimensions();
    Ok(LoadedImage { width, height, image })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png");
        RgbaImage::from_pixel(30, 20, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (30, 20));
        assert_eq!(loaded.pixels().len(), 30 * 20 * 4);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_image(Path::new("/no/such/sheet.jpg")).err().unwrap();
        assert!(err.to_string().contains("Could not open image"));
    }
}
