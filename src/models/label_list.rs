// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The set of labels found on (or drawn onto) the current sheet.

use super::label::{Label, LabelType};
use crate::util::geometry::{Point, Scale};
use serde::{Deserialize, Serialize};

/// Ordered list of labels. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelList {
    labels: Vec<Label>,
}

impl From<Vec<Label>> for LabelList {
    fn from(labels: Vec<Label>) -> Self {
        Self { labels }
    }
}

impl LabelList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// True if any label carries OCR (or typed) text.
    pub fn has_text(&self) -> bool {
        self.labels.iter().any(|lb| !lb.text.is_empty())
    }

    pub fn push(&mut self, label: Label) {
        self.labels.push(label);
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Label> {
        self.labels.iter()
    }

    /// Label by 1-based index, as shown to the user.
    pub fn base1(&self, index: usize) -> Option<&Label> {
        index.checked_sub(1).and_then(|i| self.labels.get(i))
    }

    pub fn base1_mut(&mut self, index: usize) -> Option<&mut Label> {
        index.checked_sub(1).and_then(move |i| self.labels.get_mut(i))
    }

    /// Set the type of every label under the canvas position.
    /// Returns the number of labels changed.
    pub fn retype_at(&mut self, canvas: Point, scale: Scale, label_type: LabelType) -> usize {
        let mut changed = 0;
        for label in self.labels.iter_mut().filter(|lb| lb.hit(canvas, scale)) {
            label.label_type = label_type;
            changed += 1;
        }
        changed
    }

    /// Drop every label under the canvas position.
    /// Returns the number of labels removed.
    pub fn remove_at(&mut self, canvas: Point, scale: Scale) -> usize {
        let before = self.labels.len();
        self.labels.retain(|lb| !lb.hit(canvas, scale));
        before - self.labels.len()
    }
}

impl<'a> IntoIterator for &'a LabelList {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}
