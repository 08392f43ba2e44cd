use crate::error::UploadError;
use crate::upload::types::{MessageKind, SelectedFile, UploadMessage};

pub const INVALID_TYPE_MESSAGE: &str = "Only CSV or JSON files allowed";
pub const TOO_LARGE_MESSAGE: &str = "File exceeds the 10 MB limit";
pub const UNREADABLE_FILE_MESSAGE: &str = "Could not read the selected file";
pub const NO_FILE_MESSAGE: &str = "Please select a file to upload";
pub const SUCCESS_MESSAGE: &str = "Upload successful";
pub const FAILURE_MESSAGE: &str = "Upload failed";

/// Identifies one submit attempt. Events from earlier attempts are ignored.
pub type SubmissionId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum UploadPhase {
    Idle,
    Uploading { progress: f32 },
    Success { message: String },
    Error { message: String },
}

impl Default for UploadPhase {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadState {
    selected: Option<SelectedFile>,
    phase: UploadPhase,
    submission: SubmissionId,
}

impl UploadState {
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.phase, UploadPhase::Uploading { .. })
    }

    pub fn progress(&self) -> Option<f32> {
        match self.phase {
            UploadPhase::Uploading { progress } => Some(progress),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<UploadMessage> {
        match &self.phase {
            UploadPhase::Success { message } => Some(UploadMessage {
                kind: MessageKind::Success,
                text: message.clone(),
            }),
            UploadPhase::Error { message } => Some(UploadMessage {
                kind: MessageKind::Error,
                text: message.clone(),
            }),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.is_uploading()
    }

    pub fn can_reset(&self) -> bool {
        self.selected.is_some() && !self.is_uploading()
    }

    /// Replaces the selection with a file that already passed validation.
    pub fn accept_file(&mut self, file: SelectedFile) -> Result<(), UploadError> {
        if self.is_uploading() {
            return Err(UploadError::Busy);
        }
        self.selected = Some(file);
        self.phase = UploadPhase::Idle;
        Ok(())
    }

    /// Shows a validation failure while keeping whatever was selected before.
    pub fn reject_file(&mut self, error: &UploadError) -> Result<(), UploadError> {
        if self.is_uploading() {
            return Err(UploadError::Busy);
        }
        let message = match error {
            UploadError::TooLarge { .. } => TOO_LARGE_MESSAGE,
            UploadError::Io(_) => UNREADABLE_FILE_MESSAGE,
            _ => INVALID_TYPE_MESSAGE,
        };
        self.phase = UploadPhase::Error {
            message: message.to_string(),
        };
        Ok(())
    }

    pub fn begin_submission(&mut self) -> Result<(SubmissionId, SelectedFile), UploadError> {
        if self.is_uploading() {
            return Err(UploadError::Busy);
        }
        let Some(file) = self.selected.clone() else {
            self.phase = UploadPhase::Error {
                message: NO_FILE_MESSAGE.to_string(),
            };
            return Err(UploadError::NoFileSelected);
        };

        self.submission += 1;
        self.phase = UploadPhase::Uploading { progress: 0.0 };
        Ok((self.submission, file))
    }

    /// Returns whether the update was applied.
    pub fn advance_progress(&mut self, submission: SubmissionId, value: f32) -> bool {
        if submission != self.submission {
            return false;
        }
        match &mut self.phase {
            UploadPhase::Uploading { progress } => {
                *progress = progress.max(value.clamp(0.0, 100.0));
                true
            }
            _ => false,
        }
    }

    /// Leaves the uploading phase on both outcomes.
    pub fn finish(&mut self, submission: SubmissionId, succeeded: bool) -> bool {
        if submission != self.submission || !self.is_uploading() {
            return false;
        }
        self.phase = if succeeded {
            UploadPhase::Success {
                message: SUCCESS_MESSAGE.to_string(),
            }
        } else {
            UploadPhase::Error {
                message: FAILURE_MESSAGE.to_string(),
            }
        };
        true
    }

    /// Clears the form after a success, unless the user already moved on.
    pub fn expire_success(&mut self, submission: SubmissionId) -> bool {
        if submission != self.submission || !matches!(self.phase, UploadPhase::Success { .. }) {
            return false;
        }
        self.clear();
        true
    }

    pub fn reset(&mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        self.selected = None;
        self.phase = UploadPhase::Idle;
        self.submission += 1;
    }
}
