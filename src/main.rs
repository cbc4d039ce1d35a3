mod api;
mod app;
mod coach_paths;
mod config;
mod gatekeeper;
mod monitor;
mod orchestrator;
mod structured_logger;
mod tui;

use anyhow::{Context, Result};
use api::ApiClient;
use app::cli::Cli;
use clap::Parser;
use config::ClientConfig;
use std::sync::Arc;
use structured_logger::StructuredLogger;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    app::runtime::run_then_shutdown(runtime, app::runtime::SHUTDOWN_GRACE, run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let user_config = coach_paths::user_config_path().ok();
    let config = ClientConfig::resolve(
        cli.config.as_deref(),
        user_config.as_deref(),
        &cli.overrides(),
    )?;

    let run_id = uuid::Uuid::new_v4().to_string();
    let logs_dir = coach_paths::logs_dir()?;
    let logger = Arc::new(
        StructuredLogger::new(&run_id, &logs_dir).context("Failed to open the event log")?,
    );
    logger.log(
        "Client",
        serde_json::json!({
            "type": "Started",
            "build": env!("INTERVIEW_COACH_GIT_SHA"),
            "api_base_url": config.api_base_url,
            "headless": cli.headless,
            "monitor": config.monitor.enabled,
        }),
    );

    let client = Arc::new(ApiClient::new(&config));

    if cli.headless {
        let signed_in = app::headless::run_headless(
            client.clone(),
            &client.auth_url(),
            logger,
            &mut std::io::stdout(),
        )
        .await?;
        if !signed_in {
            std::process::exit(1);
        }
        return Ok(());
    }

    app::tui_runner::run_tui(config, tui::Backends::from_client(client), logger).await
}
