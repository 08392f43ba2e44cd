use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use intake_uploader::{
    config::load_server_settings,
    logging::init_tracing,
    mock_server::{build_router, MockIntakeState},
};
use tracing::info;

/// Local stand-in for the intake endpoint.
#[derive(Debug, Parser)]
#[command(name = "mock-intake")]
struct Args {
    /// Settings file, defaults to ./mock_intake.toml
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    bind: Option<String>,
    #[arg(long)]
    delay_ms: Option<u64>,
    /// Probability in [0, 1] that a request succeeds
    #[arg(long)]
    success_rate: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");
    let args = Args::parse();

    let mut settings = load_server_settings(args.config.as_deref());
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }
    if let Some(delay_ms) = args.delay_ms {
        settings.delay_ms = delay_ms;
    }
    if let Some(rate) = args.success_rate {
        settings.success_rate = rate.clamp(0.0, 1.0);
    }

    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;
    let app = build_router(MockIntakeState::from_settings(&settings));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        %addr,
        delay_ms = settings.delay_ms,
        success_rate = settings.success_rate,
        "mock intake server listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
