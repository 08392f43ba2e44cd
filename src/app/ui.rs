use super::IntakeUploader;
use eframe::egui::{self, Align, Color32, RichText, Stroke};
use intake_uploader::upload::validation::{ADVERTISED_MAX_BYTES, ALLOWED_EXTENSIONS};
use intake_uploader::upload::{MessageKind, UploadMessage};
use intake_uploader::utils::color::Palette;
use intake_uploader::utils::file_size::FileSizeUtils;
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);

impl IntakeUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let footer_height = 60.0;
            let content_height = ui.available_height() - footer_height;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Upload File");
                    });
                    ui.add_space(20.0);

                    self.render_picker(ui);
                    ui.add_space(12.0);

                    if let Some(file) = self.controller.state().selected_file() {
                        ui.group(|ui| {
                            ui.label(RichText::new("File info:").strong());
                            egui::Grid::new("file_info").num_columns(2).show(ui, |ui| {
                                ui.label("Name:");
                                ui.label(RichText::new(&file.name).strong());
                                ui.end_row();
                                ui.label("Size:");
                                let size = FileSizeUtils::format_size(file.size_bytes);
                                ui.label(RichText::new(size).strong());
                                ui.end_row();
                            });
                        });
                        ui.add_space(12.0);
                    }

                    if let Some(progress) = self.controller.state().progress() {
                        ui.horizontal(|ui| {
                            ui.label("Uploading...");
                            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                                ui.label(format!("{}%", progress.round()));
                            });
                        });
                        ui.add(
                            egui::ProgressBar::new(progress / 100.0)
                                .animate(false)
                                .fill(ACCENT),
                        );
                        ui.add_space(12.0);
                    }

                    if let Some(message) = self.controller.state().message() {
                        render_message(ui, &message);
                        ui.add_space(12.0);
                    }

                    self.render_actions(ui);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(10.0);
                self.render_footer(ui);
            });
        });
    }

    fn render_picker(&mut self, ui: &mut egui::Ui) {
        let uploading = self.controller.state().is_uploading();
        ui.group(|ui| {
            ui.label("Choose a CSV or JSON file");
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let button = egui::Button::new("📁 Select File");
                if ui.add_enabled(!uploading, button).clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("CSV or JSON", &ALLOWED_EXTENSIONS)
                        .pick_file()
                    {
                        self.select_path(&path);
                    }
                }
                if let Some(file) = self.controller.state().selected_file() {
                    ui.label(format!("Selected: {}", file.path.display()));
                }
            });
        });
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        let state = self.controller.state();
        let can_submit = state.can_submit();
        let can_reset = state.can_reset();
        let label = if state.is_uploading() {
            "Uploading..."
        } else {
            "📤 Upload"
        };

        ui.vertical_centered(|ui| {
            let upload = egui::Button::new(label).min_size(egui::vec2(200.0, 36.0));
            if ui.add_enabled(can_submit, upload).clicked() {
                self.start_upload();
            }

            if can_reset {
                ui.add_space(6.0);
                let cancel = egui::Button::new("Cancel").min_size(egui::vec2(200.0, 36.0));
                if ui.add(cancel).clicked() {
                    self.reset_form();
                }
            }
        });
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        let muted = ui.visuals().text_color().gamma_multiply(0.6);
        ui.label(
            RichText::new(format!("Endpoint: {}", self.intake_url))
                .small()
                .color(muted),
        );
        ui.label(
            RichText::new(format!(
                "Max size: {}",
                FileSizeUtils::format_size(ADVERTISED_MAX_BYTES)
            ))
            .small()
            .color(muted),
        );
        ui.label(
            RichText::new("Only CSV and JSON files are supported")
                .small()
                .color(muted),
        );
    }
}

fn render_message(ui: &mut egui::Ui, message: &UploadMessage) {
    let (text_color, fill) = match message.kind {
        MessageKind::Success => (Palette::success_text(), Palette::success_fill()),
        MessageKind::Error => (Palette::error_text(), Palette::error_fill()),
    };

    egui::Frame::none()
        .fill(fill)
        .stroke(Stroke::new(1.0, text_color.gamma_multiply(0.3)))
        .rounding(4.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.colored_label(text_color, RichText::new(&message.text).strong());
        });
}
