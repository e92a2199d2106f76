//! Configuration schema definitions.
//!
//! This module defines the static (boot-time) configuration of the board
//! server. All types derive Serde traits for deserialization from config
//! files. Static config is distinct from the hot config: it is read once
//! at startup and never reloaded.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root static configuration for the board server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Boards hosted by this server, in display order.
    pub boards: Vec<String>,

    /// Board reserved for staff; excluded from public navigation.
    pub staff_board: String,

    /// Paths to the on-disk inputs of the reload pipeline.
    pub paths: PathsConfig,

    /// Shared key-value store settings (secret bootstrap).
    pub store: StoreConfig,

    /// Client bundle rebuild settings.
    pub rebuild: RebuildConfig,

    /// Site identity values exposed to templates.
    pub site: SiteConfig,

    /// Image-handling settings exposed to templates.
    pub imager: ImagerConfig,
}

/// Locations of the files the reload pipeline consumes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Hot configuration document.
    pub hot_config: PathBuf,

    /// Exclusion (ban) address list.
    pub exits: PathBuf,

    /// Directory holding page templates.
    pub tmpl_dir: PathBuf,

    /// Directory holding static fallback pages.
    pub www_dir: PathBuf,

    /// Directory holding the generated-script manifest and bundles.
    pub state_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            hot_config: PathBuf::from("hot.toml"),
            exits: PathBuf::from("exits.txt"),
            tmpl_dir: PathBuf::from("tmpl"),
            www_dir: PathBuf::from("www"),
            state_dir: PathBuf::from("state"),
        }
    }
}

/// Shared store connection settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Store URL (e.g. "redis://127.0.0.1/"). When absent, an in-process
    /// store is used; the signing secret then does not survive restarts.
    pub url: Option<String>,
}

/// Client bundle rebuild settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RebuildConfig {
    /// Command invoked to rebuild the client bundles, argv-style.
    /// Empty means no rebuild step.
    pub command: Vec<String>,
}

/// Site identity values; overlaid onto the template context with the
/// highest priority.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Name shown for unnamed posters.
    pub anon_name: String,

    /// Base URL pages are served under.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Board".to_string(),
            anon_name: "Anonymous".to_string(),
            base_url: "/".to_string(),
        }
    }
}

/// Image-handling configuration; overlaid onto the template context
/// between the hot snapshot and the static site values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ImagerConfig {
    /// Base URL images and thumbnails are served from.
    pub media_url: String,

    /// JPEG quality used for thumbnails.
    pub thumb_quality: u32,

    /// Maximum accepted upload size in bytes.
    pub image_filesize_max: u64,
}

impl Default for ImagerConfig {
    fn default() -> Self {
        Self {
            media_url: "../media/".to_string(),
            thumb_quality: 50,
            image_filesize_max: 4 * 1024 * 1024,
        }
    }
}
