use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{http::header, routing::post, Router};
use intake_uploader::{
    mock_server::{build_router, FixedOutcome, MockIntakeState, ACCEPTED_MESSAGE},
    upload::{
        resolve_intake_url,
        state::{FAILURE_MESSAGE, SUCCESS_MESSAGE},
        HttpIntakeClient, IntakeClient, IntakeMeta, SelectedFile, SubmissionPayload,
        UploadController, UploadPhase, WorkflowOptions,
    },
    ErrorKind, UploadError,
};
use tokio::runtime::Handle;

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

async fn mock_intake(succeeds: bool) -> SocketAddr {
    serve(build_router(MockIntakeState {
        delay: Duration::from_millis(20),
        outcome: Arc::new(FixedOutcome(succeeds)),
    }))
    .await
}

fn client_for(addr: SocketAddr) -> HttpIntakeClient {
    let url = resolve_intake_url(&format!("http://{addr}"), "/api").expect("url");
    HttpIntakeClient::new(url, Duration::from_secs(5)).expect("client")
}

fn fast_options() -> WorkflowOptions {
    WorkflowOptions {
        tick: Duration::from_millis(1),
        success_reset_delay: Duration::from_millis(50),
        ..WorkflowOptions::default()
    }
}

fn orders() -> SelectedFile {
    SelectedFile::new("orders.json", 512, "/data/orders.json")
}

#[tokio::test]
async fn http_client_receives_success_envelope() {
    let addr = mock_intake(true).await;
    let payload = SubmissionPayload::for_file(
        &orders(),
        "https://mock-storage.example.com/files/",
        &IntakeMeta::default(),
    );

    let envelope = client_for(addr).submit(&payload).await.expect("accepted");
    assert!(envelope.success);
    assert_eq!(envelope.message, ACCEPTED_MESSAGE);

    let record = envelope.data.expect("record");
    assert_eq!(record.file_url, payload.file_url);
    assert_eq!(record.meta, IntakeMeta::default());
}

#[tokio::test]
async fn http_client_maps_server_error_to_rejection() {
    let addr = mock_intake(false).await;
    let payload = SubmissionPayload::for_file(
        &orders(),
        "https://mock-storage.example.com/files/",
        &IntakeMeta::default(),
    );

    let err = client_for(addr).submit(&payload).await.unwrap_err();
    assert!(matches!(err, UploadError::Rejected { status: 500 }));
    assert_eq!(err.kind(), ErrorKind::Submission);
}

#[tokio::test]
async fn http_client_treats_unparsable_body_as_failure() {
    let app = Router::new().route("/api/intake", post(|| async { "accepted, probably" }));
    let addr = serve(app).await;
    let payload = SubmissionPayload::for_file(
        &orders(),
        "https://mock-storage.example.com/files/",
        &IntakeMeta::default(),
    );

    let err = client_for(addr).submit(&payload).await.unwrap_err();
    assert!(matches!(err, UploadError::MalformedResponse(_)));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn http_client_rejects_non_object_json_body() {
    let app = Router::new().route(
        "/api/intake",
        post(|| async { ([(header::CONTENT_TYPE, "application/json")], "[]") }),
    );
    let addr = serve(app).await;
    let payload = SubmissionPayload::for_file(
        &orders(),
        "https://mock-storage.example.com/files/",
        &IntakeMeta::default(),
    );

    let err = client_for(addr).submit(&payload).await.unwrap_err();
    assert!(matches!(err, UploadError::MalformedResponse(_)));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn controller_completes_against_mock_endpoint_and_resets() {
    let addr = mock_intake(true).await;
    let mut controller = UploadController::new(
        Arc::new(client_for(addr)),
        Handle::current(),
        fast_options(),
    );

    controller.select_file(orders()).expect("valid file");
    controller.submit().expect("started");

    assert_eq!(
        controller.settle().await,
        &UploadPhase::Success {
            message: SUCCESS_MESSAGE.into()
        }
    );

    while controller.has_pending_work() {
        controller.process_next().await;
    }
    assert_eq!(controller.state().phase(), &UploadPhase::Idle);
    assert!(controller.state().selected_file().is_none());
}

#[tokio::test]
async fn controller_keeps_file_when_endpoint_fails() {
    let addr = mock_intake(false).await;
    let mut controller = UploadController::new(
        Arc::new(client_for(addr)),
        Handle::current(),
        fast_options(),
    );

    controller.select_file(orders()).expect("valid file");
    controller.submit().expect("started");

    assert_eq!(
        controller.settle().await,
        &UploadPhase::Error {
            message: FAILURE_MESSAGE.into()
        }
    );
    assert!(!controller.state().is_uploading());
    assert_eq!(controller.state().selected_file(), Some(&orders()));
}

#[tokio::test]
async fn controller_reports_unreachable_endpoint_as_failure() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        listener.local_addr().expect("addr")
    };
    let mut controller = UploadController::new(
        Arc::new(client_for(addr)),
        Handle::current(),
        fast_options(),
    );

    controller.select_file(orders()).expect("valid file");
    controller.submit().expect("started");

    assert_eq!(
        controller.settle().await,
        &UploadPhase::Error {
            message: FAILURE_MESSAGE.into()
        }
    );
    assert_eq!(controller.state().selected_file(), Some(&orders()));
}
