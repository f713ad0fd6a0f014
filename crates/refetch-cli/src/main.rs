//! refetch - CLI tool for authenticated HTTP requests.
//!
//! This is a thin wrapper over the `refetch` libraries, intended for
//! exercising an API that uses bearer tokens with refresh, from scripts
//! and the shell.

mod cli;
mod commands;
mod notify;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Request(args) => commands::request::run(args).await,
        Commands::Refresh(args) => commands::refresh::run(args).await,
        Commands::Session(cmd) => commands::session::run(cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}
