//! Script manifest stage.
//!
//! The bundler writes `scripts.json` describing the generated bundles;
//! this stage adopts the bundle identifiers into the snapshot and loads
//! the moderation module source into the resource cache.

use serde::Deserialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

use crate::config::ServerConfig;
use crate::state::resources::keys;
use crate::state::{Resource, State};

#[derive(Debug, Error)]
pub enum ScriptsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bad script manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("bad script manifest: {0}")]
    Invalid(&'static str),
}

/// Manifest produced by the bundle build.
#[derive(Debug, Deserialize)]
pub struct ScriptManifest {
    pub vendor: String,
    pub client: String,
    #[serde(rename = "mod")]
    pub module: String,
}

impl ScriptManifest {
    fn validate(&self) -> Result<(), ScriptsError> {
        if self.vendor.is_empty() {
            return Err(ScriptsError::Invalid("vendor bundle id is empty"));
        }
        if self.client.is_empty() {
            return Err(ScriptsError::Invalid("client bundle id is empty"));
        }
        if self.module.is_empty() {
            return Err(ScriptsError::Invalid("module file name is empty"));
        }
        Ok(())
    }
}

/// Run the script-manifest stage against the given state.
pub async fn reload_scripts(state: &State, config: &ServerConfig) -> Result<(), ScriptsError> {
    let manifest_path = config.paths.state_dir.join("scripts.json");
    let raw = fs::read_to_string(&manifest_path)
        .await
        .map_err(|source| ScriptsError::Read {
            path: manifest_path,
            source,
        })?;

    let manifest: ScriptManifest = serde_json::from_str(&raw)?;
    manifest.validate()?;

    state.hot.update(|snapshot| {
        snapshot.vendor_js = Some(manifest.vendor.clone());
        snapshot.client_js = Some(manifest.client.clone());
    });

    let module_path = config.paths.state_dir.join(&manifest.module);
    let module_src = fs::read_to_string(&module_path)
        .await
        .map_err(|source| ScriptsError::Read {
            path: module_path,
            source,
        })?;
    state.resources.insert(keys::MOD_JS, Resource::Text(module_src));

    tracing::info!(vendor = %manifest.vendor, client = %manifest.client, "Script manifest loaded");
    Ok(())
}
