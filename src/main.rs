//! # postline Main Entry Point
//!
//! Parses the command line, loads the profile, and dispatches one form
//! (or a batch of forms) against the backend.

use anyhow::Result;
use postline::batch;
use postline::cmd_args::{Action, CommandLineArgs};
use postline::config;
use postline::{ApiClient, Dispatcher, TerminalView};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Dependencies whose own logging is only interesting when it warns
const QUIET_TARGETS: &[&str] = &[
    "reqwest", "hyper", "hyper_util", "h2", "rustls", "tokio", "tokio_util", "tower",
];

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cmd_args = CommandLineArgs::parse();
    init_tracing_subscriber(cmd_args.verbose())?;

    let profile_path = config::get_profile_path();
    let mut profile = config::load_profile(cmd_args.profile(), &profile_path)?;
    if let Some(server) = cmd_args.server() {
        profile = profile.with_server(server);
    }
    tracing::debug!(
        "Using profile '{}' against {} ({} dialect)",
        profile.name(),
        profile.server(),
        profile.dialect()
    );

    let client = ApiClient::new(&profile)?;
    let mut dispatcher = Dispatcher::new(client, profile.dialect(), TerminalView::stdout());

    let succeeded = match cmd_args.action() {
        Action::Submit { form, fields } => dispatcher.submit(*form, fields).await.is_success(),
        Action::Batch { path } => {
            let entries = batch::load_batch(path)?;
            batch::run_batch(&mut dispatcher, &entries)
                .await
                .all_succeeded()
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing_subscriber(verbose: bool) -> Result<()> {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let mut filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(format!(
            "{}_LOG_LEVEL",
            env!("CARGO_PKG_NAME").to_uppercase()
        ))
        .from_env_lossy();
    for target in QUIET_TARGETS {
        filter = filter.add_directive(format!("{target}=warn").parse()?);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    Ok(())
}
