//! soundcheck entry point.
//!
//! Diagnostics go to stdout; logs go to stderr (`RUST_LOG`, or `-v`).

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use soundcheck::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default = if cli.verbose {
        "soundcheck=debug"
    } else {
        "soundcheck=warn"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();

    let mut stdout = std::io::stdout().lock();
    match soundcheck::run(&cli, &mut stdout) {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
