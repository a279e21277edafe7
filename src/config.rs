// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings, read from a TOML file at startup.

use crate::io::client::OcrFilter;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an alternative settings file.
pub const CONFIG_ENV: &str = "SHEET_LABELER_CONFIG";

/// Settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "sheet-labeler.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Base URL of the label-finder / OCR server
    pub server_url: String,
    /// Initial confidence threshold for the finder
    pub confidence: f64,
    /// Smallest side, in canvas pixels, of a hand-drawn label
    pub min_box_size: f64,
    pub ocr_filter: OcrFilter,
    /// Request timeout; OCR of a full sheet is slow
    pub timeout_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            server_url: "http://localhost:8000".to_string(),
            confidence: 0.1,
            min_box_size: 20.0,
            ocr_filter: OcrFilter::Typewritten,
            timeout_secs: 300,
        }
    }
}

impl AppSettings {
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings = toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = toml::to_string_pretty(self).context("Failed to serialize AppSettings to TOML")?;
        std::fs::write(path, s)?;
        Ok(())
    }

    /// Load settings from `$SHEET_LABELER_CONFIG` or `./sheet-labeler.toml`.
    ///
    /// A missing file gives the defaults; a broken one is logged and also
    /// gives the defaults.
    pub fn load() -> Self {
        Self::load_or_default(&config_path())
    }

    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read_from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::error!("{:#}", e);
                Self::default()
            }
        }
    }
}

/// Where settings are read from and saved to.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}
