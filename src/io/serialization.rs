// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label export and import.
//!
//! Labels are written in the same shape the label services exchange, a
//! plain array of label objects, so an exported file can be loaded back.
//! Each label can also be written out as a PNG cropped from the sheet.

use crate::models::label_list::LabelList;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Export labels to YAML format.
pub fn export_yaml(labels: &LabelList, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(labels)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export labels to JSON format.
pub fn export_json(labels: &LabelList, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(labels)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import labels from JSON format.
pub fn import_json(path: &Path) -> Result<LabelList> {
    let json = std::fs::read_to_string(path)?;
    let labels = serde_json::from_str(&json)
        .with_context(|| format!("'{}' is not a label list", path.display()))?;
    Ok(labels)
}

/// Import labels from YAML format.
pub fn import_yaml(path: &Path) -> Result<LabelList> {
    let yaml = std::fs::read_to_string(path)?;
    let labels = serde_yaml::from_str(&yaml)
        .with_context(|| format!("'{}' is not a label list", path.display()))?;
    Ok(labels)
}

/// Write each label's region of `sheet` to `dir` as `{stem}_{n}.png`.
///
/// `n` is the 1-based label number. Labels lying entirely off the image
/// are skipped. Returns the paths written.
pub fn export_label_images(
    sheet: &RgbaImage,
    labels: &LabelList,
    dir: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        let Some((x, y, w, h)) = label.crop_rect(sheet.width(), sheet.height()) else {
            log::warn!("Label {} lies outside the sheet, skipped", i + 1);
            continue;
        };
        let crop = image::imageops::crop_imm(sheet, x, y, w, h).to_image();
        let path = dir.join(format!("{}_{}.png", stem, i + 1));
        crop.save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
