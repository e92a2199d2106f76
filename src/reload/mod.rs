//! Hot-reload pipeline.
//!
//! # Data Flow
//! ```text
//! Reloader::reload()
//!     → refresh dependency graph (collaborator)
//!     → hot.rs    (publish snapshot → exits → hot hooks)
//!     → pipeline rebuild (collaborator)
//!     → scripts.rs (manifest → bundle ids → module source)
//!     → resources.rs (templates → context → precompile → hooks)
//! ```
//!
//! # Design Decisions
//! - Stages run strictly in order; `?` gives abort-on-first-error and
//!   forwards the failing stage's error unchanged
//! - Reloads are not internally serialized; callers must not overlap
//!   invocations

pub mod exits;
pub mod hot;
pub mod resources;
pub mod scripts;
pub mod watcher;

use std::sync::Arc;
use thiserror::Error;

use crate::config::ServerConfig;
use crate::pipeline::{BundlePipeline, PipelineError};
use crate::state::State;

pub use hot::HotConfigError;
pub use resources::ResourceError;
pub use scripts::ScriptsError;

/// Failure of a reload; carries the failing stage's error.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("hot config stage failed: {0}")]
    HotConfig(#[from] HotConfigError),

    #[error("bundle rebuild stage failed: {0}")]
    Rebuild(#[from] PipelineError),

    #[error("script manifest stage failed: {0}")]
    Scripts(#[from] ScriptsError),

    #[error("resource build stage failed: {0}")]
    Resources(#[from] ResourceError),
}

/// Sequences the reload stages over the shared state.
pub struct Reloader {
    state: State,
    config: Arc<ServerConfig>,
    pipeline: Arc<dyn BundlePipeline>,
}

impl Reloader {
    pub fn new(
        state: State,
        config: Arc<ServerConfig>,
        pipeline: Arc<dyn BundlePipeline>,
    ) -> Self {
        Self {
            state,
            config,
            pipeline,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Run the full reload pipeline. On the first stage failure the
    /// remaining stages are skipped and the error is forwarded.
    pub async fn reload(&self) -> Result<(), ReloadError> {
        tracing::info!("Reload started");
        self.pipeline.refresh_deps();

        hot::reload_hot_config(&self.state, &self.config).await?;
        self.pipeline.rebuild().await?;
        scripts::reload_scripts(&self.state, &self.config).await?;
        resources::build_resources(&self.state, &self.config).await?;

        tracing::info!("Reload complete");
        Ok(())
    }
}
