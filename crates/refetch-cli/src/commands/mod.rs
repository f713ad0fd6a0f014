//! Command implementations.

pub mod refresh;
pub mod request;
pub mod session;

use std::fs;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use refetch_file::FileStore;

/// Open the session store at its per-user location.
pub(crate) fn session_store() -> Result<FileStore> {
    let dirs =
        ProjectDirs::from("", "", "refetch").context("Could not determine config directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(FileStore::new(data_dir.join("session.json")))
}
