// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sheet canvas.
//!
//! Shows the sheet shrunk to fit the panel and draws every label box on
//! top of it each frame straight from the label list. Pointer positions
//! are reported relative to the top-left corner of the displayed sheet.

use crate::editor::Editor;
use crate::models::{
    label::LabelType,
    label_list::LabelList,
    sheet::Sheet,
};
use crate::util::geometry::{Point, Scale, Size};

pub const TYPEWRITTEN_COLOR: egui::Color32 = egui::Color32::from_rgb(0xd9, 0x5f, 0x02);
pub const OTHER_COLOR: egui::Color32 = egui::Color32::from_rgb(0x1b, 0x9e, 0x77);

const BOX_WIDTH: f32 = 3.0;
const CURRENT_BOX_WIDTH: f32 = 5.0;

/// Result of canvas interaction, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    None,
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    Click(Point),
}

/// What the canvas produced this frame.
pub struct CanvasFrame {
    pub action: CanvasAction,
    /// Scale and displayed size of the sheet, when one is shown
    pub view: Option<(Scale, Size)>,
}

pub fn label_color(label_type: LabelType) -> egui::Color32 {
    match label_type {
        LabelType::Typewritten => TYPEWRITTEN_COLOR,
        LabelType::Other => OTHER_COLOR,
    }
}

fn to_screen(image_rect: egui::Rect, canvas: Point) -> egui::Pos2 {
    image_rect.min + egui::vec2(canvas.x as f32, canvas.y as f32)
}

fn to_canvas(image_rect: egui::Rect, pos: egui::Pos2) -> Point {
    let offset = pos - image_rect.min;
    Point::new(offset.x as f64, offset.y as f64)
}

/// Outline shapes for every label, the browsed one (1-based `current`) wider.
pub fn label_shapes(
    labels: &LabelList,
    image_rect: egui::Rect,
    scale: Scale,
    current: usize,
) -> Vec<egui::Shape> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let min = scale.to_canvas(Point::new(label.left, label.top));
            let max = scale.to_canvas(Point::new(label.right, label.bottom));
            let rect = egui::Rect::from_min_max(to_screen(image_rect, min), to_screen(image_rect, max));
            let width = if i + 1 == current { CURRENT_BOX_WIDTH } else { BOX_WIDTH };
            egui::Shape::rect_stroke(rect, 0.0, egui::Stroke::new(width, label_color(label.label_type)))
        })
        .collect()
}

/// Display the sheet canvas and translate pointer input.
pub fn show(
    ui: &mut egui::Ui,
    sheet: Option<&Sheet>,
    image_texture: &Option<egui::TextureHandle>,
    editor: &Editor,
) -> CanvasFrame {
    let mut frame = CanvasFrame {
        action: CanvasAction::None,
        view: None,
    };
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(sheet), Some(texture)) = (sheet, image_texture) else {
            show_welcome(ui);
            return;
        };

        let available = ui.available_size();
        let viewport = Size::new(available.x as f64, available.y as f64);
        let scale = Scale::fit(sheet.size(), viewport);
        let display = scale.display_size(sheet.size());
        frame.view = Some((scale, display));

        // Center the sheet
        let display_vec = egui::vec2(display.width as f32, display.height as f32);
        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + (available - display_vec) / 2.0,
            display_vec,
        );

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let response = ui.allocate_rect(image_rect, egui::Sense::click_and_drag());
        frame.action = pointer_action(ui, &response, image_rect);

        let painter = ui.painter();
        painter.extend(label_shapes(editor.labels(), image_rect, scale, editor.current()));

        if let Some((min, max)) = editor.live_rect() {
            painter.rect_stroke(
                egui::Rect::from_min_max(to_screen(image_rect, min), to_screen(image_rect, max)),
                0.0,
                egui::Stroke::new(BOX_WIDTH, TYPEWRITTEN_COLOR),
            );
        }
    });

    ui.separator();
    ui.horizontal(|ui| {
        ui.label(format!("Fix mode: {:?}", editor.mode));
        ui.separator();
        match sheet {
            Some(sheet) => {
                ui.label(format!(
                    "{} ({}x{}), {} labels",
                    sheet.file_name(),
                    sheet.width,
                    sheet.height,
                    editor.labels().len()
                ));
                let scale = editor.scale();
                ui.separator();
                ui.label(format!("scale {:.3}", scale.x));
            }
            None => {
                ui.label("No sheet loaded");
            }
        }
    });

    frame
}

fn pointer_action(ui: &egui::Ui, response: &egui::Response, image_rect: egui::Rect) -> CanvasAction {
    if response.drag_started() {
        // Anchor at the press, not where the drag threshold was crossed
        let origin = ui
            .input(|i| i.pointer.press_origin())
            .or_else(|| response.interact_pointer_pos());
        if let Some(pos) = origin {
            return CanvasAction::PointerDown(to_canvas(image_rect, pos));
        }
    } else if response.drag_stopped() {
        let pos = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.latest_pos()));
        if let Some(pos) = pos {
            return CanvasAction::PointerUp(to_canvas(image_rect, pos));
        }
    } else if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            return CanvasAction::PointerMove(to_canvas(image_rect, pos));
        }
    } else if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            return CanvasAction::Click(to_canvas(image_rect, pos));
        }
    }
    CanvasAction::None
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Sheet Labeler")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Find, read and fix the labels on a herbarium sheet")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("File → Open Sheet...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::label::Label;

    fn outline(shape: &egui::Shape) -> (egui::Rect, egui::Stroke) {
        match shape {
            egui::Shape::Rect(rect) => (rect.rect, rect.stroke),
            other => panic!("unexpected shape {:?}", other),
        }
    }

    fn labels() -> LabelList {
        LabelList::from(vec![
            Label::new(LabelType::Typewritten, 100.0, 100.0, 300.0, 200.0, 0.9),
            Label::new(LabelType::Other, 400.0, 40.0, 500.0, 80.0, 0.4),
        ])
    }

    #[test]
    fn test_shapes_are_scaled_and_offset() {
        let image_rect = egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(500.0, 250.0));
        let shapes = label_shapes(&labels(), image_rect, Scale { x: 0.5, y: 0.5 }, 0);
        assert_eq!(shapes.len(), 2);

        let (rect, stroke) = outline(&shapes[0]);
        assert_eq!(rect.min, egui::pos2(60.0, 70.0));
        assert_eq!(rect.max, egui::pos2(160.0, 120.0));
        assert_eq!(stroke, egui::Stroke::new(BOX_WIDTH, TYPEWRITTEN_COLOR));

        let (_, stroke) = outline(&shapes[1]);
        assert_eq!(stroke.color, OTHER_COLOR);
    }

    #[test]
    fn test_current_label_is_wider() {
        let image_rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(100.0, 100.0));
        let shapes = label_shapes(&labels(), image_rect, Scale::IDENTITY, 2);
        assert_eq!(outline(&shapes[0]).1.width, BOX_WIDTH);
        assert_eq!(outline(&shapes[1]).1.width, CURRENT_BOX_WIDTH);
    }

    #[test]
    fn test_render_is_idempotent() {
        let image_rect = egui::Rect::from_min_size(egui::pos2(3.0, 4.0), egui::vec2(640.0, 480.0));
        let scale = Scale { x: 0.32, y: 0.32 };
        let first = label_shapes(&labels(), image_rect, scale, 1);
        let second = label_shapes(&labels(), image_rect, scale, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_pointer_conversion_roundtrip() {
        let image_rect = egui::Rect::from_min_size(egui::pos2(37.0, 12.5), egui::vec2(300.0, 300.0));
        let canvas = to_canvas(image_rect, egui::pos2(137.0, 62.5));
        assert_eq!(canvas, Point::new(100.0, 50.0));
        assert_eq!(to_screen(image_rect, canvas), egui::pos2(137.0, 62.5));
    }
}
