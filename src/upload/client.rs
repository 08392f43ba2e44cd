use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::error::UploadError;
use crate::upload::types::{IntakeEnvelope, SubmissionPayload};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait IntakeClient: Send + Sync {
    /// One attempt, no retries. Any non-2xx status or unreadable body is an error.
    async fn submit(&self, payload: &SubmissionPayload) -> Result<IntakeEnvelope, UploadError>;
}

#[derive(Clone)]
pub struct HttpIntakeClient {
    client: reqwest::Client,
    intake_url: Url,
}

impl HttpIntakeClient {
    pub fn new(intake_url: Url, timeout: Duration) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, intake_url })
    }

    pub fn intake_url(&self) -> &Url {
        &self.intake_url
    }
}

#[async_trait]
impl IntakeClient for HttpIntakeClient {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<IntakeEnvelope, UploadError> {
        debug!(url = %self.intake_url, file_url = %payload.file_url, "posting intake payload");

        let response = self
            .client
            .post(self.intake_url.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "intake endpoint rejected submission");
            return Err(UploadError::Rejected {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = serde_json::from_slice(&response.bytes().await?)?;
        if !body.is_object() {
            return Err(UploadError::MalformedResponse(serde::de::Error::custom(
                "intake response is not a JSON object",
            )));
        }
        Ok(serde_json::from_value(body)?)
    }
}

/// Builds `<base>/intake`. A relative base such as `/api` is resolved against `origin`.
pub fn resolve_intake_url(origin: &str, api_base: &str) -> Result<Url, UploadError> {
    let base = match Url::parse(api_base) {
        Ok(absolute) => absolute,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(origin)?.join(api_base)?,
        Err(err) => return Err(err.into()),
    };

    let path = format!("{}/intake", base.path().trim_end_matches('/'));
    let mut intake = base;
    intake.set_path(&path);
    Ok(intake)
}
