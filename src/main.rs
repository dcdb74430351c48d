//! Main entry point for the stuffbin CLI app

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `STUFFBIN_LOG=debug`.
const LOG_ENV: &str = "STUFFBIN_LOG";

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = stuffbin::cli_runner::run_cli_app() {
        if e.downcast_ref::<clap::Error>().is_none() {
            eprintln!("Error: {}", e);
        }
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}
