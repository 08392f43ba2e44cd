//! Stand-in intake endpoint that answers after a delay with a random outcome.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::ServerSettings;
use crate::upload::types::{IntakeEnvelope, IntakeRecord, SubmissionPayload};
use crate::utils::entropy;

pub const ACCEPTED_MESSAGE: &str = "File uploaded successfully";
pub const FAILED_MESSAGE: &str = "Upload failed due to server error";

/// Decides whether a single request succeeds.
pub trait OutcomeSource: Send + Sync {
    fn succeeds(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct RandomOutcome {
    pub success_rate: f64,
}

impl OutcomeSource for RandomOutcome {
    fn succeeds(&self) -> bool {
        entropy::unit_interval() < self.success_rate
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub bool);

impl OutcomeSource for FixedOutcome {
    fn succeeds(&self) -> bool {
        self.0
    }
}

#[derive(Clone)]
pub struct MockIntakeState {
    pub delay: Duration,
    pub outcome: Arc<dyn OutcomeSource>,
}

impl MockIntakeState {
    pub fn from_settings(settings: &ServerSettings) -> Self {
        Self {
            delay: settings.delay(),
            outcome: Arc::new(RandomOutcome {
                success_rate: settings.success_rate,
            }),
        }
    }
}

pub fn build_router(state: MockIntakeState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/intake", post(intake))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn intake(
    State(state): State<Arc<MockIntakeState>>,
    Json(payload): Json<SubmissionPayload>,
) -> impl IntoResponse {
    info!(file_url = %payload.file_url, meta = ?payload.meta, "received upload request");

    tokio::time::sleep(state.delay).await;

    if state.outcome.succeeds() {
        let now = Utc::now();
        let record = IntakeRecord {
            file_url: payload.file_url,
            meta: payload.meta,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            process_id: format!("PROC_{}", now.timestamp_millis()),
        };
        info!(process_id = %record.process_id, "intake accepted");
        (
            StatusCode::OK,
            Json(IntakeEnvelope {
                success: true,
                message: ACCEPTED_MESSAGE.to_string(),
                data: Some(record),
            }),
        )
    } else {
        info!("intake failed by simulated server error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(IntakeEnvelope {
                success: false,
                message: FAILED_MESSAGE.to_string(),
                data: None,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body, body::Body, http::Request};
    use tower::ServiceExt;

    fn app(succeeds: bool) -> Router {
        build_router(MockIntakeState {
            delay: Duration::from_secs(1),
            outcome: Arc::new(FixedOutcome(succeeds)),
        })
    }

    fn intake_request() -> Request<Body> {
        Request::post("/api/intake")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "fileUrl": "https://mock-storage.example.com/files/orders.csv",
                    "meta": { "salesOrg": "1000", "distChannel": "10", "division": "00" }
                })
                .to_string(),
            ))
            .expect("request")
    }

    async fn envelope(response: axum::response::Response) -> IntakeEnvelope {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let response = app(true)
            .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_intake_echoes_payload_after_delay() {
        let started = tokio::time::Instant::now();
        let response = app(true).oneshot(intake_request()).await.expect("response");

        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_eq!(response.status(), StatusCode::OK);

        let envelope = envelope(response).await;
        assert!(envelope.success);
        assert_eq!(envelope.message, ACCEPTED_MESSAGE);
        let record = envelope.data.expect("data");
        assert_eq!(record.file_url, "https://mock-storage.example.com/files/orders.csv");
        assert_eq!(record.meta.sales_org, "1000");
        assert!(record.process_id.starts_with("PROC_"));
        assert!(record.timestamp.ends_with('Z'));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_intake_returns_server_error() {
        let response = app(false).oneshot(intake_request()).await.expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let envelope = envelope(response).await;
        assert!(!envelope.success);
        assert_eq!(envelope.message, FAILED_MESSAGE);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn random_outcome_respects_extremes() {
        assert!((0..100).all(|_| RandomOutcome { success_rate: 1.0 }.succeeds()));
        assert!((0..100).all(|_| !RandomOutcome { success_rate: 0.0 }.succeeds()));
    }
}
