// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label properties panel.
//!
//! Browse the labels one at a time, preview the region of the sheet each
//! covers and correct its OCR text.

use crate::editor::Editor;
use crate::models::{label::Label, sheet::Sheet};
use crate::ui::canvas::label_color;
use crate::util::geometry::{Scale, Size};

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    Select(usize),
    SetText(String),
}

const PREVIEW_SIZE: f32 = 240.0;

/// Display the properties panel.
pub fn show(
    ui: &mut egui::Ui,
    editor: &Editor,
    sheet: Option<&Sheet>,
    image_texture: &Option<egui::TextureHandle>,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;
    let labels = editor.labels();

    ui.heading("Labels");
    ui.separator();

    if labels.is_empty() {
        ui.label(egui::RichText::new("No labels yet. Use Find labels or draw some.").weak());
        return action;
    }

    if !labels.has_text() {
        ui.label(egui::RichText::new("Run OCR labels to read the text.").weak());
    }

    let current = editor.current();
    ui.horizontal(|ui| {
        if ui.add_enabled(current > 1, egui::Button::new("◀")).clicked() {
            action = PropertiesAction::Select(current - 1);
        }
        ui.label(format!("{} of {}", current, labels.len()));
        if ui.add_enabled(current < labels.len(), egui::Button::new("▶")).clicked() {
            action = PropertiesAction::Select(current + 1);
        }
    });

    if let Some(label) = editor.current_label() {
        ui.label(egui::RichText::new(label.info()).color(label_color(label.label_type)));

        if let (Some(sheet), Some(texture)) = (sheet, image_texture) {
            show_preview(ui, label, sheet, texture);
        }

        ui.label("Text:");
        let mut text = label.text.clone();
        let edit = egui::TextEdit::multiline(&mut text)
            .desired_rows(4)
            .desired_width(f32::INFINITY);
        if ui.add(edit).changed() {
            action = PropertiesAction::SetText(text);
        }
    }

    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (i, label) in labels.iter().enumerate() {
            let index = i + 1;
            let snippet: String = label.text.lines().next().unwrap_or("").chars().take(32).collect();
            let text = egui::RichText::new(format!("{}. {} {}", index, label.label_type.as_str(), snippet))
                .color(label_color(label.label_type));
            if ui.selectable_label(index == current, text).clicked() {
                action = PropertiesAction::Select(index);
            }
        }
    });

    action
}

/// Draw the label's region of the sheet, shrunk to fit the preview box.
fn show_preview(
    ui: &mut egui::Ui,
    label: &Label,
    sheet: &Sheet,
    texture: &egui::TextureHandle,
) {
    let Some((x, y, w, h)) = label.crop_rect(sheet.width, sheet.height) else {
        return;
    };
    let box_width = ui.available_width().min(PREVIEW_SIZE);
    let scale = Scale::fit(
        Size::new(w as f64, h as f64),
        Size::new(box_width as f64, PREVIEW_SIZE as f64),
    );
    let shown = scale.display_size(Size::new(w as f64, h as f64));

    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(shown.width as f32, shown.height as f32),
        egui::Sense::hover(),
    );
    let uv = egui::Rect::from_min_max(
        egui::pos2(x as f32 / sheet.width as f32, y as f32 / sheet.height as f32),
        egui::pos2(
            (x + w) as f32 / sheet.width as f32,
            (y + h) as f32 / sheet.height as f32,
        ),
    );
    ui.painter().image(texture.id(), rect, uv, egui::Color32::WHITE);
}
