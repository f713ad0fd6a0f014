//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::refresh::RefreshArgs;
use crate::commands::request::RequestArgs;
use crate::commands::session::SessionCommand;

/// CLI tool for authenticated HTTP requests with token refresh.
#[derive(Parser, Debug)]
#[command(name = "refetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send an authenticated request through the pipeline
    Request(RequestArgs),
    /// Force a refresh of the stored access token
    Refresh(RefreshArgs),
    /// Inspect or modify the stored session
    Session(SessionCommand),
}
