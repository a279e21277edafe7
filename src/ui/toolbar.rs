// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar: label service controls and fix-mode selection.

use crate::editor::FixMode;
use crate::io::client::OcrFilter;

/// Request raised from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    FindLabels,
    OcrLabels,
}

/// What the toolbar may offer right now.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarState {
    pub has_sheet: bool,
    pub has_labels: bool,
    pub busy: bool,
}

impl ToolbarState {
    pub fn can_find(&self) -> bool {
        self.has_sheet && !self.busy
    }

    /// With no labels the server reads the whole sheet, so only a sheet is needed.
    pub fn can_ocr(&self) -> bool {
        self.has_sheet && !self.busy
    }

    /// Drawing only needs a sheet; retyping and removing need labels.
    pub fn can_use(&self, mode: FixMode) -> bool {
        match mode {
            FixMode::Inspect => true,
            FixMode::Draw => self.has_sheet && !self.busy,
            FixMode::Typewritten | FixMode::Other | FixMode::Remove => {
                self.has_sheet && self.has_labels && !self.busy
            }
        }
    }
}

/// Display the toolbar.
pub fn show(
    ui: &mut egui::Ui,
    state: ToolbarState,
    mode: &mut FixMode,
    confidence: &mut f64,
    filter: &mut OcrFilter,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.add_enabled_ui(state.can_find(), |ui| {
            ui.label("Confidence:");
            ui.add(egui::Slider::new(confidence, 0.0..=1.0).fixed_decimals(2));
            if ui.button("🔍 Find labels").clicked() {
                action = ToolbarAction::FindLabels;
            }
        });

        ui.separator();

        ui.add_enabled_ui(state.can_ocr(), |ui| {
            ui.radio_value(filter, OcrFilter::Typewritten, "Typewritten");
            ui.radio_value(filter, OcrFilter::All, "All");
            if ui.button("🔤 OCR labels").clicked() {
                action = ToolbarAction::OcrLabels;
            }
        });

        if state.busy {
            ui.spinner();
        }

        ui.separator();

        ui.label("Fix:");
        for (choice, text) in [
            (FixMode::Inspect, "👁 Inspect"),
            (FixMode::Draw, "▭ Draw"),
            (FixMode::Typewritten, "Typewritten"),
            (FixMode::Other, "Other"),
            (FixMode::Remove, "🗑 Remove"),
        ] {
            let button = egui::SelectableLabel::new(*mode == choice, text);
            if ui.add_enabled(state.can_use(choice), button).clicked() {
                *mode = choice;
            }
        }

        ui.separator();

        let mode_text = match mode {
            FixMode::Inspect => "Browse labels in the side panel",
            FixMode::Draw => "Drag on the sheet to draw a new label",
            FixMode::Typewritten => "Click a label to mark it typewritten",
            FixMode::Other => "Click a label to mark it as other",
            FixMode::Remove => "Click a label to remove it",
        };

        ui.label(egui::RichText::new(mode_text).italics().weak());
    });

    action
}
