//! screpo: hotkey-driven screenshots with a self-updating HTML gallery

use std::process::ExitCode;

use clap::Parser;
use screpo::{app, cli::Cli};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_FILTER: &str = "screpo=info,screpo_core=info";

// Stays synchronous: dialogs and the hotkey event loop need the main thread
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    tracing::debug!("Starting {:?}", cli.command);

    match app::launch(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            if let Some(hint) = app::remediation_hint(&e) {
                eprintln!("hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

// Respects RUST_LOG; logs go to stderr so stdout stays for command output
fn init_logging(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}
