//! Client bundle rebuild collaborator.
//!
//! The reload pipeline treats the dependency-bundle rebuild as an opaque
//! step behind this trait. The real rebuild is an external tool invoked
//! as a command; tests substitute a no-op.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("rebuild command failed to start: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("rebuild command exited with {0}")]
    Failed(std::process::ExitStatus),
}

/// Dependency-graph refresh and bundle rebuild, invoked by the
/// orchestrator between the hot-config and manifest stages.
#[async_trait]
pub trait BundlePipeline: Send + Sync {
    /// Refresh the dependency graph before the reload begins.
    fn refresh_deps(&self);

    /// Rebuild the client bundles; must complete before the script
    /// manifest is read.
    async fn rebuild(&self) -> Result<(), PipelineError>;
}

/// Pipeline that does nothing. Used when no rebuild command is
/// configured, and by tests.
pub struct NoopPipeline;

#[async_trait]
impl BundlePipeline for NoopPipeline {
    fn refresh_deps(&self) {}

    async fn rebuild(&self) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// Pipeline that shells out to a configured argv-style command.
pub struct CommandPipeline {
    command: Vec<String>,
}

impl CommandPipeline {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

#[async_trait]
impl BundlePipeline for CommandPipeline {
    fn refresh_deps(&self) {}

    async fn rebuild(&self) -> Result<(), PipelineError> {
        let (program, args) = match self.command.split_first() {
            Some(split) => split,
            None => return Ok(()),
        };

        tracing::info!(command = %self.command.join(" "), "Rebuilding client bundles");
        let status = tokio::process::Command::new(program)
            .args(args)
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(PipelineError::Failed(status))
        }
    }
}
