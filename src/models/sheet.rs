// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The sheet image currently open for labeling.

use crate::util::geometry::Size;
use std::path::{Path, PathBuf};

/// Source file and pixel size of the loaded sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Sheet {
    /// Create a sheet record for an image of the given dimensions.
    pub fn new(path: PathBuf, width: u32, height: u32) -> Self {
        Self { path, width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sheet".to_string())
    }

    /// File stem used to name exported files.
    pub fn stem(&self) -> String {
        stem_of(&self.path)
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sheet".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let sheet = Sheet::new(PathBuf::from("/data/sheets/KU-00123.jpg"), 4000, 6000);
        assert_eq!(sheet.file_name(), "KU-00123.jpg");
        assert_eq!(sheet.stem(), "KU-00123");
        assert_eq!(sheet.size(), Size::new(4000.0, 6000.0));
    }

    #[test]
    fn test_names_without_file_component() {
        let sheet = Sheet::new(PathBuf::from("/"), 1, 1);
        assert_eq!(sheet.file_name(), "sheet");
        assert_eq!(sheet.stem(), "sheet");
    }
}
