use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::config::ClientSettings;
use crate::error::UploadError;
use crate::upload::client::IntakeClient;
use crate::upload::progress::{
    ProgressSimulation, ProgressSource, RandomIncrements, ScheduledTask, DEFAULT_TICK,
};
use crate::upload::state::{SubmissionId, UploadPhase, UploadState};
use crate::upload::types::{
    IntakeEnvelope, IntakeMeta, SelectedFile, SubmissionPayload, DEFAULT_STORAGE_PREFIX,
};
use crate::upload::validation::UploadPolicy;

pub const DEFAULT_SUCCESS_RESET_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    pub policy: UploadPolicy,
    pub tick: Duration,
    pub success_reset_delay: Duration,
    pub storage_prefix: String,
    pub meta: IntakeMeta,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            policy: UploadPolicy::default(),
            tick: DEFAULT_TICK,
            success_reset_delay: DEFAULT_SUCCESS_RESET_DELAY,
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            meta: IntakeMeta::default(),
        }
    }
}

impl WorkflowOptions {
    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self {
            policy: UploadPolicy {
                max_size_bytes: settings.max_upload_bytes,
                ..UploadPolicy::default()
            },
            storage_prefix: settings.storage_prefix.clone(),
            meta: settings.meta(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub enum WorkflowEvent {
    Progress {
        submission: SubmissionId,
        value: f32,
    },
    Finished {
        submission: SubmissionId,
        outcome: Result<IntakeEnvelope, UploadError>,
    },
    SuccessExpired {
        submission: SubmissionId,
    },
}

/// Drives the upload form. State lives here and is only changed by the owner
/// thread; spawned work reports back through [`WorkflowEvent`]s.
pub struct UploadController {
    state: UploadState,
    options: WorkflowOptions,
    client: Arc<dyn IntakeClient>,
    progress_source: Arc<dyn ProgressSource>,
    runtime: Handle,
    events_tx: UnboundedSender<WorkflowEvent>,
    events_rx: UnboundedReceiver<WorkflowEvent>,
    submission_task: Option<ScheduledTask>,
    expiry_task: Option<(SubmissionId, ScheduledTask)>,
}

impl UploadController {
    pub fn new(client: Arc<dyn IntakeClient>, runtime: Handle, options: WorkflowOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: UploadState::default(),
            options,
            client,
            progress_source: Arc::new(RandomIncrements),
            runtime,
            events_tx,
            events_rx,
            submission_task: None,
            expiry_task: None,
        }
    }

    pub fn with_progress_source(mut self, source: Arc<dyn ProgressSource>) -> Self {
        self.progress_source = source;
        self
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn options(&self) -> &WorkflowOptions {
        &self.options
    }

    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), UploadError> {
        if self.state.is_uploading() {
            return Err(UploadError::Busy);
        }

        match self.options.policy.check(&file) {
            Ok(()) => {
                info!(name = %file.name, size = file.size_bytes, "file selected");
                self.cancel_expiry();
                self.state.accept_file(file)
            }
            Err(err) => {
                warn!(name = %file.name, error = %err, "file rejected");
                self.state.reject_file(&err)?;
                Err(err)
            }
        }
    }

    pub fn select_path(&mut self, path: &Path) -> Result<(), UploadError> {
        match SelectedFile::from_path(path) {
            Ok(file) => self.select_file(file),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read selected file");
                self.state.reject_file(&err)?;
                Err(err)
            }
        }
    }

    /// Starts the progress simulation followed by a single intake request.
    pub fn submit(&mut self) -> Result<SubmissionId, UploadError> {
        let (submission, file) = match self.state.begin_submission() {
            Ok(started) => started,
            Err(UploadError::Busy) => {
                debug!("submit ignored, upload already running");
                return Err(UploadError::Busy);
            }
            Err(err) => {
                warn!(error = %err, "submit without a selected file");
                return Err(err);
            }
        };
        self.cancel_expiry();

        let payload =
            SubmissionPayload::for_file(&file, &self.options.storage_prefix, &self.options.meta);
        info!(submission, file_url = %payload.file_url, "starting upload");

        let client = self.client.clone();
        let source = self.progress_source.clone();
        let simulation = ProgressSimulation::new(self.options.tick);
        let events = self.events_tx.clone();

        self.submission_task = Some(ScheduledTask::start(&self.runtime, async move {
            simulation
                .run(source.as_ref(), |value| {
                    let _ = events.send(WorkflowEvent::Progress { submission, value });
                })
                .await;

            let outcome = client.submit(&payload).await;
            let _ = events.send(WorkflowEvent::Finished {
                submission,
                outcome,
            });
        }));

        Ok(submission)
    }

    pub fn reset(&mut self) {
        if let Some(mut task) = self.submission_task.take() {
            task.stop();
        }
        self.cancel_expiry();
        self.state.reset();
        info!("form reset");
    }

    /// Applies every event that is already queued. Returns whether any arrived.
    pub fn pump(&mut self) -> bool {
        let mut applied = false;
        loop {
            match self.events_rx.try_recv() {
                Ok(event) => {
                    self.apply(event);
                    applied = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return applied,
            }
        }
    }

    /// Waits for the next event and applies it.
    pub async fn process_next(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Processes events until the current submission leaves the uploading phase.
    pub async fn settle(&mut self) -> &UploadPhase {
        while self.state.is_uploading() {
            if !self.process_next().await {
                break;
            }
        }
        self.state.phase()
    }

    /// Whether spawned work may still produce events worth repainting for.
    pub fn has_pending_work(&self) -> bool {
        self.state.is_uploading() || self.expiry_task.is_some()
    }

    fn apply(&mut self, event: WorkflowEvent) {
        match event {
            WorkflowEvent::Progress { submission, value } => {
                self.state.advance_progress(submission, value);
            }
            WorkflowEvent::Finished {
                submission,
                outcome,
            } => {
                let succeeded = match &outcome {
                    Ok(envelope) => {
                        info!(submission, message = %envelope.message, "upload accepted");
                        true
                    }
                    Err(err) => {
                        warn!(submission, error = %err, kind = ?err.kind(), "upload failed");
                        false
                    }
                };
                if !self.state.finish(submission, succeeded) {
                    return;
                }
                self.submission_task = None;
                if succeeded {
                    self.schedule_expiry(submission);
                }
            }
            WorkflowEvent::SuccessExpired { submission } => {
                if self.state.expire_success(submission) {
                    debug!(submission, "success message expired, form cleared");
                }
                if matches!(&self.expiry_task, Some((scheduled, _)) if *scheduled == submission) {
                    self.expiry_task = None;
                }
            }
        }
    }

    fn schedule_expiry(&mut self, submission: SubmissionId) {
        let delay = self.options.success_reset_delay;
        let events = self.events_tx.clone();
        let task = ScheduledTask::start(&self.runtime, async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(WorkflowEvent::SuccessExpired { submission });
        });
        self.expiry_task = Some((submission, task));
    }

    fn cancel_expiry(&mut self) {
        if let Some((_, mut task)) = self.expiry_task.take() {
            task.stop();
        }
    }
}
