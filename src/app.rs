// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app owns the loaded sheet, its texture and the label [`Editor`]. Slow
//! work (decoding the sheet, calling the label services) runs on worker
//! threads that report back over channels polled once per frame.

use crate::config::{self, AppSettings};
use crate::editor::{EditOutcome, Editor};
use crate::io::{
    client::{ClientError, LabelClient, OcrFilter},
    media::{self, LoadedImage},
    serialization,
};
use crate::models::{label_list::LabelList, sheet::Sheet};
use crate::ui::{
    canvas::{self, CanvasAction},
    properties::{self, PropertiesAction},
    toolbar::{self, ToolbarAction, ToolbarState},
};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::Duration;

/// Which label service a pending request went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServiceCall {
    Find,
    Ocr,
}

impl ServiceCall {
    fn error_title(&self) -> &'static str {
        match self {
            ServiceCall::Find => "Find labels error",
            ServiceCall::Ocr => "OCR labels error",
        }
    }
}

/// A label service request in flight, tagged with the sheet it was made for.
struct PendingRequest {
    call: ServiceCall,
    sheet: PathBuf,
    receiver: Receiver<Result<LabelList, ClientError>>,
}

/// Result of background sheet loading.
struct LoadedSheet {
    sheet: Sheet,
    image: LoadedImage,
}

/// Show a blocking error dialog naming the failed operation.
fn alert(title: &str, message: &str) {
    log::error!("{}: {}", title, message);
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

/// Apply a label service reply to the editor.
///
/// Replies for a sheet other than the one now open are dropped. Returns the
/// message to alert with when the request failed; labels are left as they
/// were in that case.
fn apply_reply(
    editor: &mut Editor,
    open_sheet: Option<&Path>,
    call: ServiceCall,
    requested_for: &Path,
    result: Result<LabelList, ClientError>,
) -> Option<String> {
    if open_sheet != Some(requested_for) {
        log::info!("Dropped {:?} reply for {}", call, requested_for.display());
        return None;
    }
    match result {
        Ok(labels) => {
            log::info!("{:?} finished with {} labels", call, labels.len());
            editor.replace_labels(labels);
            None
        }
        Err(e) => Some(e.to_string()),
    }
}

/// Main application state.
pub struct SheetLabelerApp {
    settings: AppSettings,

    /// Label service client, absent if it could not be built
    client: Option<LabelClient>,

    /// Currently open sheet
    sheet: Option<Sheet>,

    /// Full-size sheet pixels, kept for exporting label crops
    sheet_image: Option<RgbaImage>,

    /// Sheet texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Labels, fix mode and draw tool
    editor: Editor,

    /// Finder confidence threshold
    confidence: f64,

    ocr_filter: OcrFilter,

    /// Receiver for background sheet loading
    image_loader: Option<Receiver<Result<LoadedSheet, String>>>,

    /// Receiver for the label service request in flight
    label_request: Option<PendingRequest>,

    /// Loading state message
    loading_message: Option<String>,
}

impl SheetLabelerApp {
    /// Create the application from loaded settings.
    pub fn new(settings: AppSettings) -> Self {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = match LabelClient::new(&settings.server_url, timeout) {
            Ok(client) => Some(client),
            Err(e) => {
                log::error!("Could not create label client: {}", e);
                None
            }
        };

        Self {
            client,
            sheet: None,
            sheet_image: None,
            image_texture: None,
            editor: Editor::new(settings.min_box_size),
            confidence: settings.confidence,
            ocr_filter: settings.ocr_filter,
            image_loader: None,
            label_request: None,
            loading_message: None,
            settings,
        }
    }

    /// Load a sheet image and create a texture for display (asynchronously).
    ///
    /// The previous sheet, its labels and any request still in flight for it
    /// are dropped.
    pub fn open_sheet(&mut self, path: PathBuf) {
        self.editor.reset();
        self.label_request = None;
        self.sheet = None;
        self.sheet_image = None;
        self.image_texture = None;

        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading sheet...".to_string());

        std::thread::spawn(move || {
            let result = media::load_image(&path)
                .map(|image| {
                    log::info!("Loaded sheet: {} ({}x{})", path.display(), image.width, image.height);
                    LoadedSheet {
                        sheet: Sheet::new(path.clone(), image.width, image.height),
                        image,
                    }
                })
                .map_err(|e| format!("{:#}", e));

            let _ = sender.send(result);
        });
    }

    /// Send the sheet (and for OCR, the current labels) to a label service.
    fn request_labels(&mut self, call: ServiceCall) {
        let Some(sheet) = &self.sheet else {
            return;
        };
        let Some(client) = self.client.clone() else {
            alert(call.error_title(), "No label server is configured");
            return;
        };

        let path = sheet.path.clone();
        let labels = self.editor.labels().clone();
        let conf = self.confidence;
        let filter = self.ocr_filter;

        let (sender, receiver) = channel();
        std::thread::spawn(move || {
            let result = match call {
                ServiceCall::Find => client.find_labels(&path, conf),
                ServiceCall::Ocr => client.ocr_labels(&path, &labels, filter),
            };
            let _ = sender.send(result);
        });

        log::info!("Requested {:?} for {}", call, sheet.file_name());
        self.label_request = Some(PendingRequest {
            call,
            sheet: sheet.path.clone(),
            receiver,
        });
    }

    fn poll_image_loader(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.image_loader else {
            return;
        };
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err("The sheet loader stopped unexpectedly".to_string()),
        };
        self.image_loader = None;
        self.loading_message = None;

        match result {
            Ok(loaded) => {
                let size = [loaded.image.width as usize, loaded.image.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, loaded.image.pixels());
                let texture = ctx.load_texture("sheet", color_image, egui::TextureOptions::LINEAR);

                self.image_texture = Some(texture);
                self.sheet_image = Some(loaded.image.image);
                self.sheet = Some(loaded.sheet);
            }
            Err(e) => alert("Open sheet error", &e),
        }
    }

    fn poll_label_request(&mut self) {
        let Some(request) = &self.label_request else {
            return;
        };
        let call = request.call;
        let result = match request.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                self.label_request = None;
                alert(call.error_title(), "The request was interrupted");
                return;
            }
        };
        let Some(request) = self.label_request.take() else {
            return;
        };

        let open_sheet = self.sheet.as_ref().map(|sheet| sheet.path.as_path());
        if let Some(message) = apply_reply(&mut self.editor, open_sheet, call, &request.sheet, result) {
            alert(call.error_title(), &message);
        }
    }

    fn export_labels(&self, path: PathBuf) {
        let labels = self.editor.labels();
        let result = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serialization::export_yaml(labels, &path),
            _ => serialization::export_json(labels, &path),
        };

        match result {
            Ok(_) => log::info!("Exported {} labels to {}", labels.len(), path.display()),
            Err(e) => alert("Export labels error", &format!("{:#}", e)),
        }
    }

    fn import_labels(&mut self, path: PathBuf) {
        let result = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serialization::import_yaml(&path),
            _ => serialization::import_json(&path),
        };

        match result {
            Ok(labels) => {
                log::info!("Imported {} labels from {}", labels.len(), path.display());
                self.editor.replace_labels(labels);
            }
            Err(e) => alert("Load labels error", &format!("{:#}", e)),
        }
    }

    fn export_label_images(&self, dir: PathBuf) {
        let (Some(sheet), Some(image)) = (&self.sheet, &self.sheet_image) else {
            return;
        };
        match serialization::export_label_images(image, self.editor.labels(), &dir, &sheet.stem()) {
            Ok(paths) => log::info!("Wrote {} label images to {}", paths.len(), dir.display()),
            Err(e) => alert("Export label images error", &format!("{:#}", e)),
        }
    }

    fn save_settings(&mut self) {
        self.settings.confidence = self.confidence;
        self.settings.ocr_filter = self.ocr_filter;
        let path = config::config_path();
        match self.settings.save_to_file(&path) {
            Ok(_) => log::info!("Saved settings to {}", path.display()),
            Err(e) => alert("Save settings error", &format!("{:#}", e)),
        }
    }

    fn handle_canvas(&mut self, action: CanvasAction) {
        match action {
            CanvasAction::PointerDown(pos) => {
                self.editor.pointer_down(pos);
            }
            CanvasAction::PointerMove(pos) => {
                self.editor.pointer_move(pos);
            }
            // A press that moved past the drag threshold still fixes labels
            CanvasAction::PointerUp(pos) => match self.editor.release(pos) {
                Ok(outcome) => self.log_outcome(outcome),
                Err(e) => {
                    log::warn!("{}", e);
                    alert("Draw label error", &e.to_string());
                }
            },
            CanvasAction::Click(pos) => {
                let outcome = self.editor.click(pos);
                self.log_outcome(outcome);
            }
            CanvasAction::None => {}
        }
    }

    fn log_outcome(&self, outcome: EditOutcome) {
        match outcome {
            EditOutcome::Retyped(n) => log::info!("Retyped {} labels", n),
            EditOutcome::Removed(n) => {
                log::info!("Removed {} labels, total: {}", n, self.editor.labels().len())
            }
            EditOutcome::Added | EditOutcome::Nothing => {}
        }
    }

    fn toolbar_state(&self) -> ToolbarState {
        ToolbarState {
            has_sheet: self.sheet.is_some(),
            has_labels: !self.editor.labels().is_empty(),
            busy: self.label_request.is_some() || self.image_loader.is_some(),
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let has_sheet = self.sheet.is_some();
        let has_labels = !self.editor.labels().is_empty();

        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Sheet...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", media::IMAGE_EXTENSIONS)
                        .pick_file()
                    {
                        self.open_sheet(path);
                    }
                    ui.close_menu();
                }
                if ui.add_enabled(has_sheet, egui::Button::new("Load Labels...")).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Labels", &["json", "yaml", "yml"])
                        .pick_file()
                    {
                        self.import_labels(path);
                    }
                    ui.close_menu();
                }
                ui.separator();
                ui.add_enabled_ui(has_labels, |ui| {
                    ui.menu_button("Export Labels", |ui| {
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("labels.json")
                                .save_file()
                            {
                                self.export_labels(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("labels.yaml")
                                .save_file()
                            {
                                self.export_labels(path);
                            }
                            ui.close_menu();
                        }
                    });
                    if ui.button("Export Label Images...").clicked() {
                        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                            self.export_label_images(dir);
                        }
                        ui.close_menu();
                    }
                });
                ui.separator();
                if ui.button("Save Settings").clicked() {
                    self.save_settings();
                    ui.close_menu();
                }
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui.add_enabled(has_labels, egui::Button::new("Clear Labels")).clicked() {
                    self.editor.clear_labels();
                    log::info!("Cleared labels");
                    ui.close_menu();
                }
            });
        });
    }
}

impl eframe::App for SheetLabelerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_image_loader(ctx);
        self.poll_label_request();

        // Keep polling workers while they run
        if self.loading_message.is_some() || self.label_request.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ctx, ui);
        });

        let state = self.toolbar_state();
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    state,
                    &mut self.editor.mode,
                    &mut self.confidence,
                    &mut self.ocr_filter,
                )
            })
            .inner;

        match toolbar_action {
            ToolbarAction::FindLabels => self.request_labels(ServiceCall::Find),
            ToolbarAction::OcrLabels => self.request_labels(ServiceCall::Ocr),
            ToolbarAction::None => {}
        }

        let properties_action = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| {
                properties::show(ui, &self.editor, self.sheet.as_ref(), &self.image_texture)
            })
            .inner;

        match properties_action {
            PropertiesAction::Select(index) => self.editor.select(index),
            PropertiesAction::SetText(text) => self.editor.set_current_text(text),
            PropertiesAction::None => {}
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.editor.cancel_draw();
        }

        let canvas_frame = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    None
                } else {
                    Some(canvas::show(ui, self.sheet.as_ref(), &self.image_texture, &self.editor))
                }
            })
            .inner;

        if let Some(frame) = canvas_frame {
            if let Some((scale, display)) = frame.view {
                self.editor.set_view(scale, display);
            }
            self.handle_canvas(frame.action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::label::{Label, LabelType};

    #[test]
    fn test_error_titles_name_the_operation() {
        assert_eq!(ServiceCall::Find.error_title(), "Find labels error");
        assert_eq!(ServiceCall::Ocr.error_title(), "OCR labels error");
    }

    #[test]
    fn test_new_app_starts_empty() {
        let app = SheetLabelerApp::new(AppSettings::default());
        assert!(app.client.is_some());
        assert!(app.sheet.is_none());
        assert!(app.editor.labels().is_empty());
        assert_eq!(app.confidence, 0.1);
    }

    fn sheet_labels() -> LabelList {
        LabelList::from(vec![
            Label::new(LabelType::Typewritten, 100.0, 100.0, 400.0, 300.0, 0.9),
            Label::new(LabelType::Other, 1000.0, 600.0, 1400.0, 900.0, 0.5),
        ])
    }

    fn other_labels() -> LabelList {
        LabelList::from(vec![Label::new(LabelType::Other, 5.0, 5.0, 50.0, 50.0, 0.3)])
    }

    #[test]
    fn test_failed_reply_leaves_labels_unchanged() {
        let mut editor = Editor::new(20.0);
        editor.replace_labels(sheet_labels());
        let sheet = Path::new("/sheets/kansas_0001.jpg");

        let message = apply_reply(
            &mut editor,
            Some(sheet),
            ServiceCall::Ocr,
            sheet,
            Err(ClientError::Protocol("response body is a JSON string".to_string())),
        );
        assert_eq!(
            message.as_deref(),
            Some("Unexpected response from label server: response body is a JSON string")
        );
        assert_eq!(editor.labels(), &sheet_labels());

        let status = apply_reply(
            &mut editor,
            Some(sheet),
            ServiceCall::Find,
            sheet,
            Err(ClientError::Status {
                status: 500,
                body: "Internal Server Error".to_string(),
            }),
        );
        assert!(status.is_some());
        assert_eq!(editor.labels(), &sheet_labels());
    }

    #[test]
    fn test_reply_replaces_labels_for_open_sheet() {
        let mut editor = Editor::new(20.0);
        editor.replace_labels(sheet_labels());
        let sheet = Path::new("/sheets/kansas_0001.jpg");

        let message = apply_reply(&mut editor, Some(sheet), ServiceCall::Find, sheet, Ok(other_labels()));
        assert!(message.is_none());
        assert_eq!(editor.labels(), &other_labels());
    }

    #[test]
    fn test_reply_for_previous_sheet_is_dropped() {
        let mut editor = Editor::new(20.0);
        editor.replace_labels(sheet_labels());
        let old = Path::new("/sheets/kansas_0001.jpg");
        let new = Path::new("/sheets/kansas_0002.jpg");

        let message = apply_reply(&mut editor, Some(new), ServiceCall::Find, old, Ok(other_labels()));
        assert!(message.is_none());
        assert_eq!(editor.labels(), &sheet_labels());

        // Still loading the next sheet: nothing is open yet
        let failed = apply_reply(
            &mut editor,
            None,
            ServiceCall::Ocr,
            old,
            Err(ClientError::Protocol("late".to_string())),
        );
        assert!(failed.is_none());
        assert_eq!(editor.labels(), &sheet_labels());
    }

    #[test]
    fn test_open_sheet_drops_previous_sheet() {
        let mut app = SheetLabelerApp::new(AppSettings::default());
        app.sheet = Some(Sheet::new(PathBuf::from("/sheets/kansas_0001.jpg"), 2000, 1000));
        app.editor.replace_labels(sheet_labels());
        assert!(app.toolbar_state().can_find());

        let missing = tempfile::tempdir().unwrap().path().join("kansas_0002.jpg");
        app.open_sheet(missing);

        assert!(app.sheet.is_none());
        assert!(app.sheet_image.is_none());
        assert!(app.image_texture.is_none());
        assert!(app.editor.labels().is_empty());

        let state = app.toolbar_state();
        assert!(state.busy);
        assert!(!state.can_find());
        assert!(!state.can_ocr());
    }
}
