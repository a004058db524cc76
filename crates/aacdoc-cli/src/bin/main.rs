//! aacdoc CLI binary entry point
//!
//! Sets up logging and calls the library's `run_cli()` function.

use aacdoc_cli::run_cli;
use anyhow::Result;

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run_cli()
}
