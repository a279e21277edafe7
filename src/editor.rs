// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label editing session.
//!
//! The [`Editor`] owns everything the fix tools mutate: the label list, the
//! draw tool, the scale the sheet is currently shown at and the label being
//! browsed in the properties panel. Canvas handlers receive pointer
//! positions in canvas pixels relative to the top-left of the displayed
//! image and the editor does the conversion.

use crate::models::{
    draw::{DrawError, DrawState},
    label::{Label, LabelType},
    label_list::LabelList,
};
use crate::util::geometry::{Point, Scale, Size};

/// What a click or drag on the sheet does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixMode {
    Inspect,
    Draw,
    Typewritten,
    Other,
    Remove,
}

/// Result of a completed pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Nothing,
    Added,
    Retyped(usize),
    Removed(usize),
}

pub struct Editor {
    pub mode: FixMode,
    labels: LabelList,
    draw: DrawState,
    scale: Scale,
    display: Size,
    min_box_size: f64,
    /// 1-based index of the browsed label, 0 when there are none
    current: usize,
}

impl Editor {
    pub fn new(min_box_size: f64) -> Self {
        Self {
            mode: FixMode::Inspect,
            labels: LabelList::new(),
            draw: DrawState::new(),
            scale: Scale::IDENTITY,
            display: Size::default(),
            min_box_size,
            current: 0,
        }
    }

    /// Forget all labels and any drawing in progress (new sheet).
    pub fn reset(&mut self) {
        self.labels.clear();
        self.draw.reset();
        self.current = 0;
        self.mode = FixMode::Inspect;
    }

    pub fn labels(&self) -> &LabelList {
        &self.labels
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Record how the sheet is displayed: its scale and on-canvas size.
    pub fn set_view(&mut self, scale: Scale, display: Size) {
        self.scale = scale;
        self.display = display;
    }

    /// Install labels returned by the finder or OCR service.
    pub fn replace_labels(&mut self, labels: LabelList) {
        self.labels = labels;
        self.draw.reset();
        self.current = if self.labels.is_empty() { 0 } else { 1 };
        self.settle_mode();
    }

    pub fn clear_labels(&mut self) {
        self.labels.clear();
        self.draw.reset();
        self.current = 0;
        self.settle_mode();
    }

    /// The retype and remove modes need labels to act on.
    fn settle_mode(&mut self) {
        let needs_labels = matches!(self.mode, FixMode::Typewritten | FixMode::Other | FixMode::Remove);
        if needs_labels && self.labels.is_empty() {
            self.mode = FixMode::Inspect;
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.draw.is_drawing()
    }

    /// Start a rectangle if in draw mode and the pointer is on the image.
    pub fn pointer_down(&mut self, pos: Point) -> bool {
        if self.mode != FixMode::Draw || !self.display.contains(pos) {
            return false;
        }
        self.draw.begin(pos);
        true
    }

    pub fn pointer_move(&mut self, pos: Point) -> bool {
        self.draw.update(pos)
    }

    /// Finish the rectangle and append it as a label.
    pub fn pointer_up(&mut self, pos: Point) -> Result<EditOutcome, DrawError> {
        let label = self.draw.finish(pos, self.scale, self.min_box_size)?;
        log::info!(
            "Drew label ({:.0}, {:.0}) - ({:.0}, {:.0})",
            label.left,
            label.top,
            label.right,
            label.bottom
        );
        self.labels.push(label);
        self.current = self.labels.len();
        Ok(EditOutcome::Added)
    }

    /// Pointer released: finish a rectangle, or apply the fix mode at `pos`
    /// when the press was a drag that started no rectangle.
    pub fn release(&mut self, pos: Point) -> Result<EditOutcome, DrawError> {
        if self.is_drawing() {
            self.pointer_up(pos)
        } else {
            Ok(self.click(pos))
        }
    }

    /// Apply the retype or remove fix to every label under `pos`.
    pub fn click(&mut self, pos: Point) -> EditOutcome {
        match self.mode {
            FixMode::Typewritten => self.retype(pos, LabelType::Typewritten),
            FixMode::Other => self.retype(pos, LabelType::Other),
            FixMode::Remove => {
                let removed = self.labels.remove_at(pos, self.scale);
                if removed == 0 {
                    return EditOutcome::Nothing;
                }
                self.current = self.current.min(self.labels.len());
                if self.current == 0 && !self.labels.is_empty() {
                    self.current = 1;
                }
                self.settle_mode();
                EditOutcome::Removed(removed)
            }
            FixMode::Inspect | FixMode::Draw => EditOutcome::Nothing,
        }
    }

    fn retype(&mut self, pos: Point, label_type: LabelType) -> EditOutcome {
        match self.labels.retype_at(pos, self.scale, label_type) {
            0 => EditOutcome::Nothing,
            n => EditOutcome::Retyped(n),
        }
    }

    /// Abandon a rectangle in progress.
    pub fn cancel_draw(&mut self) {
        self.draw.reset();
    }

    /// Live rectangle corners in canvas space while drawing.
    pub fn live_rect(&self) -> Option<(Point, Point)> {
        self.draw.rect()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Browse to a 1-based label index; out-of-range values are clamped.
    pub fn select(&mut self, index: usize) {
        self.current = if self.labels.is_empty() {
            0
        } else {
            index.clamp(1, self.labels.len())
        };
    }

    pub fn current_label(&self) -> Option<&Label> {
        self.labels.base1(self.current)
    }

    pub fn set_current_text(&mut self, text: String) {
        if let Some(label) = self.labels.base1_mut(self.current) {
            label.text = text;
        }
    }
}
