// Main entry point - Dependency injection and command dispatch
mod domain;
mod application;
mod infrastructure;
mod presentation;

use clap::Parser;
use std::{process::ExitCode, sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

use crate::application::comparison_service::ComparisonService;
use crate::application::dashboard_service::DashboardService;
use crate::application::insight_service::InsightService;
use crate::application::notifications::Notifier;
use crate::application::report_service::ReportService;
use crate::application::session_service::SessionGate;
use crate::application::upload_service::UploadService;
use crate::infrastructure::config::load_config;
use crate::infrastructure::file_token_store::FileTokenStore;
use crate::infrastructure::http_api::HttpDashboardApi;
use crate::presentation::app_state::AppState;
use crate::presentation::cli::{Cli, Commands};
use crate::presentation::handlers;
use crate::presentation::render::{self, Output};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Views go to stdout; logs stay on stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn dispatch(state: &AppState, output: Output, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password, demo } => handlers::login(state, output, email, password, demo).await,
        Commands::Logout => handlers::logout(state, output).await,
        Commands::Whoami => handlers::whoami(state, output).await,
        Commands::Upload { file } => handlers::upload(state, output, &file).await,
        Commands::Dashboard { filters, interactive } => handlers::dashboard(state, output, &filters, interactive).await,
        Commands::Compare { plants, start, end } => handlers::compare(state, output, &plants, start, end).await,
        Commands::Prompts => handlers::prompts(state, output).await,
        Commands::Ask { question, filters } => handlers::ask(state, output, &question, &filters).await,
        Commands::SendReport { email, role, plant } => handlers::send_report(state, output, &email, role, plant).await,
        Commands::Admin => handlers::admin(state, output).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration
    let config = load_config(cli.config.as_deref())?;

    // Create adapters (infrastructure layer)
    let api = Arc::new(HttpDashboardApi::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )?);
    let token_path = config.session.token_path();
    let store = Arc::new(FileTokenStore::new(token_path.clone()));

    // Toasts are printed as they arrive
    let (notifier, mut notifications) = Notifier::channel();
    let toasts = tokio::spawn(async move {
        while let Some(note) = notifications.recv().await {
            eprintln!("{}", render::notification(&note));
        }
    });

    // Create services (application layer)
    let state = AppState {
        api_base: api.base_url().to_string(),
        token_path,
        session_gate: SessionGate::new(api.clone(), store, notifier.clone()),
        dashboard_service: DashboardService::new(api.clone()),
        upload_service: UploadService::new(api.clone(), notifier.clone()),
        insight_service: InsightService::new(api.clone(), notifier.clone()),
        comparison_service: ComparisonService::new(api.clone(), notifier.clone()),
        report_service: ReportService::new(api, notifier.clone()),
        notifier,
        config,
    };

    if !cli.command.is_public() {
        state.session_gate.restore().await;
    }

    let result = dispatch(&state, Output { json: cli.json }, cli.command).await;

    drop(state);
    let _ = toasts.await;

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) if handlers::already_reported(&e) => {
            tracing::debug!(error = %e, "command failed");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e),
    }
}
