mod ui;

use std::path::Path;
use std::time::Duration;

use eframe::{egui, App};
use intake_uploader::upload::UploadController;
use tracing::debug;

const REPAINT_INTERVAL: Duration = Duration::from_millis(50);

pub struct IntakeUploader {
    controller: UploadController,
    intake_url: String,
}

impl IntakeUploader {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        controller: UploadController,
        intake_url: String,
    ) -> Self {
        debug!(%intake_url, "initializing upload form");
        Self {
            controller,
            intake_url,
        }
    }

    pub fn select_path(&mut self, path: &Path) {
        // Failures are already reflected in the form state.
        if let Err(error) = self.controller.select_path(path) {
            debug!(path = %path.display(), %error, "selection not accepted");
        }
    }

    pub fn start_upload(&mut self) {
        if let Err(error) = self.controller.submit() {
            debug!(%error, "upload not started");
        }
    }

    pub fn reset_form(&mut self) {
        self.controller.reset();
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        if self.controller.pump() {
            ctx.request_repaint();
        }
        if self.controller.has_pending_work() {
            ctx.request_repaint_after(REPAINT_INTERVAL);
        }
    }
}

impl App for IntakeUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
