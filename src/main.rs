mod app;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use app::IntakeUploader;
use clap::Parser;
use intake_uploader::config::load_client_settings;
use intake_uploader::logging::init_tracing;
use intake_uploader::upload::{
    resolve_intake_url, HttpIntakeClient, UploadController, UploadPhase, WorkflowOptions,
};
use tokio::runtime::Runtime;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "intake-uploader", about = "Submit CSV or JSON files to the intake endpoint")]
struct Cli {
    /// Settings file, defaults to ./uploader.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Submit this file without opening a window
    #[arg(long, value_name = "FILE")]
    headless: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing("info");
    let cli = Cli::parse();

    let settings = load_client_settings(cli.config.as_deref());
    let intake_url = resolve_intake_url(&settings.server_origin, &settings.api_base)
        .context("failed to resolve intake endpoint")?;
    info!(%intake_url, "using intake endpoint");

    let client = HttpIntakeClient::new(intake_url.clone(), settings.request_timeout())
        .context("failed to build http client")?;
    let runtime = Runtime::new().context("failed to start async runtime")?;
    let controller = UploadController::new(
        Arc::new(client),
        runtime.handle().clone(),
        WorkflowOptions::from_settings(&settings),
    );

    match cli.headless {
        Some(path) => runtime.block_on(submit_headless(controller, path)),
        None => run_window(controller, intake_url.to_string()),
    }
}

async fn submit_headless(mut controller: UploadController, path: PathBuf) -> anyhow::Result<()> {
    controller
        .select_path(&path)
        .with_context(|| format!("cannot upload {}", path.display()))?;
    controller.submit()?;

    match controller.settle().await {
        UploadPhase::Success { message } => {
            println!("{message}");
            Ok(())
        }
        UploadPhase::Error { message } => anyhow::bail!("{message}"),
        phase => anyhow::bail!("upload ended in unexpected state {phase:?}"),
    }
}

/// The runtime owning the controller's tasks must outlive this call.
fn run_window(controller: UploadController, intake_url: String) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([480.0, 560.0])
            .with_min_inner_size([360.0, 460.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Upload File",
        options,
        Box::new(move |cc: &eframe::CreationContext<'_>| {
            Box::new(IntakeUploader::new(cc, controller, intake_url))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to open window: {e}"))
}
