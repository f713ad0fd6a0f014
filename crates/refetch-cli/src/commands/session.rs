//! Session command implementations.

use anyhow::Result;
use clap::{Args, Subcommand};

use refetch_core::{AccessToken, RefreshToken, SessionStore};

use crate::output;

use super::session_store;

#[derive(Args, Debug)]
pub struct SessionCommand {
    #[command(subcommand)]
    pub command: SessionSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionSubcommand {
    /// Store tokens obtained from an external login
    Set(SetArgs),
    /// Show whether tokens are stored (values are never printed)
    Show,
    /// Remove the stored session
    Clear,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Access token value
    #[arg(long)]
    pub access: String,

    /// Refresh token value
    #[arg(long)]
    pub refresh: Option<String>,
}

pub async fn run(cmd: SessionCommand) -> Result<()> {
    match cmd.command {
        SessionSubcommand::Set(args) => set(args).await,
        SessionSubcommand::Show => show().await,
        SessionSubcommand::Clear => clear().await,
    }
}

async fn set(args: SetArgs) -> Result<()> {
    let store = session_store()?;

    store
        .set_tokens(
            AccessToken::new(args.access),
            args.refresh.map(RefreshToken::new),
        )
        .await?;

    output::success("Session saved");
    output::field("Path", &store.path().display().to_string());

    Ok(())
}

async fn show() -> Result<()> {
    let store = session_store()?;
    let session = store.get().await?;

    output::field("Path", &store.path().display().to_string());
    output::field("Access token", &describe(session.access.map(|t| t.as_str().len())));
    output::field(
        "Refresh token",
        &describe(session.refresh.map(|t| t.as_str().len())),
    );

    Ok(())
}

async fn clear() -> Result<()> {
    let store = session_store()?;
    store.clear().await?;

    output::success("Session cleared");

    Ok(())
}

fn describe(len: Option<usize>) -> String {
    match len {
        Some(len) => format!("present ({} chars)", len),
        None => "absent".to_string(),
    }
}
