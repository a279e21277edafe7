// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Client for the label-finder and OCR services.
//!
//! Both endpoints take a multipart form carrying the sheet image and answer
//! with labels. Calls are blocking; the app runs them on a worker thread.

use crate::models::{label::Label, label_list::LabelList};
use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Could not read sheet '{path}': {source}")]
    Sheet {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not connect to label server: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Label server answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response from label server: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Which labels the OCR service should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrFilter {
    #[default]
    Typewritten,
    All,
}

impl OcrFilter {
    pub fn as_form_value(&self) -> &'static str {
        match self {
            OcrFilter::Typewritten => "typewritten",
            OcrFilter::All => "all",
        }
    }
}

/// Shapes a label response may take once decoded.
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelResponse {
    Bare(Vec<Label>),
    Envelope { results: Vec<Label> },
}

/// Decode a service response body.
///
/// The body is parsed exactly once. A body that turns out to be a JSON
/// string holding more JSON is rejected rather than decoded again.
pub fn decode_labels(body: &str) -> Result<LabelList> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ClientError::Protocol(format!("invalid JSON: {}", e)))?;

    if value.is_string() {
        return Err(ClientError::Protocol(
            "labels arrived as an encoded JSON string".to_string(),
        ));
    }

    match serde_json::from_value::<LabelResponse>(value) {
        Ok(LabelResponse::Bare(labels)) | Ok(LabelResponse::Envelope { results: labels }) => {
            Ok(LabelList::from(labels))
        }
        Err(_) => Err(ClientError::Protocol(
            "expected a list of labels".to_string(),
        )),
    }
}

/// Blocking client bound to one label server.
#[derive(Clone)]
pub struct LabelClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl LabelClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    /// Ask the finder for label boxes at or above `conf`.
    pub fn find_labels(&self, sheet: &Path, conf: f64) -> Result<LabelList> {
        let form = Form::new()
            .part("sheet", sheet_part(sheet)?)
            .text("conf", conf.to_string());
        self.post("find-labels", form)
    }

    /// OCR the given labels. With no labels the whole sheet is read.
    pub fn ocr_labels(&self, sheet: &Path, labels: &LabelList, filter: OcrFilter) -> Result<LabelList> {
        let labels_json = serde_json::to_string(labels)
            .map_err(|e| ClientError::Protocol(format!("could not encode labels: {}", e)))?;
        let form = Form::new()
            .text("labels", labels_json)
            .text("extract", filter.as_form_value())
            .part("sheet", sheet_part(sheet)?);
        self.post("ocr-labels", form)
    }

    fn post(&self, name: &str, form: Form) -> Result<LabelList> {
        let url = self.endpoint(name);
        log::debug!("POST {}", url);

        let response = self.http.post(&url).multipart(form).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let labels = decode_labels(&body)?;
        log::info!("{} returned {} labels", name, labels.len());
        Ok(labels)
    }
}

fn sheet_part(path: &Path) -> Result<Part> {
    let bytes = std::fs::read(path).map_err(|source| ClientError::Sheet {
        path: path.display().to_string(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sheet".to_string());
    Ok(Part::bytes(bytes).file_name(file_name))
}
