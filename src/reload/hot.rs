//! Hot configuration stage.
//!
//! Reads the declarative hot-config document, publishes a fresh snapshot
//! atomically, merges the exclusion list, and runs the hot-reload hook
//! chain. Validation failures happen before publication, so a bad
//! document never corrupts the live snapshot; exclusion or hook failures
//! happen after, with no rollback.

use serde::Deserialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

use crate::config::ServerConfig;
use crate::hooks::HookError;
use crate::state::{HotSnapshot, State};

use super::exits;

#[derive(Debug, Error)]
pub enum HotConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bad hot config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("bad hot config: missing [hot] table")]
    MissingHotTable,

    #[error("failed to read exits {path}: {source}")]
    Exits {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Hook(#[from] HookError),
}

#[derive(Deserialize)]
struct HotDocument {
    hot: Option<toml::value::Table>,
}

/// Run the hot-config stage against the given state.
pub async fn reload_hot_config(
    state: &State,
    config: &ServerConfig,
) -> Result<(), HotConfigError> {
    let path = &config.paths.hot_config;
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| HotConfigError::Read {
            path: path.clone(),
            source,
        })?;

    let document: HotDocument = toml::from_str(&raw)?;
    let table = document.hot.ok_or(HotConfigError::MissingHotTable)?;

    // Single atomic publish; prior keys do not survive.
    let snapshot = HotSnapshot::from_table(table);
    let key_count = snapshot.values.len();
    state.hot.publish(snapshot);
    tracing::info!(keys = key_count, "Hot config published");

    exits::merge_exits(&config.paths.exits, &state.hot)
        .await
        .map_err(|source| HotConfigError::Exits {
            path: config.paths.exits.clone(),
            source,
        })?;

    state.hooks.trigger_hot_reload(&state.hot).await?;
    Ok(())
}
