pub mod client;
pub mod controller;
pub mod progress;
pub mod state;
pub mod types;
pub mod validation;

pub use client::{resolve_intake_url, HttpIntakeClient, IntakeClient};
pub use controller::{UploadController, WorkflowEvent, WorkflowOptions};
pub use progress::{ProgressSource, RandomIncrements, ScheduledTask};
pub use state::{SubmissionId, UploadPhase, UploadState};
pub use types::{
    IntakeEnvelope, IntakeMeta, MessageKind, SelectedFile, SubmissionPayload, UploadMessage,
};
pub use validation::UploadPolicy;
