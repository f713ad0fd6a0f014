//! Refresh command implementation.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use refetch_core::{BaseUrl, SessionStore};
use refetch_http::AuthClient;

use crate::notify::TermNotifier;
use crate::output;

use super::session_store;

#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Base URL of the API
    #[arg(long)]
    pub base: String,
}

pub async fn run(args: RefreshArgs) -> Result<()> {
    let base = BaseUrl::new(&args.base).context("Invalid base URL")?;
    let store = Arc::new(session_store()?);

    if store.get().await?.refresh.is_none() {
        bail!("No stored session. Run 'refetch session set' first.");
    }

    let client = AuthClient::with_notifier(base, store, Arc::new(TermNotifier));

    eprintln!("{}", "Refreshing session...".dimmed());

    client
        .refresh()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed successfully");

    Ok(())
}
