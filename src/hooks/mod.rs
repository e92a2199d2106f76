//! Reload extension hooks.
//!
//! # Responsibilities
//! - Let collaborators extend reload behavior without the pipeline
//!   depending on them directly
//! - Invoke hooks sequentially in registration order
//! - Short-circuit the chain on the first failure
//!
//! # Design Decisions
//! - Hooks are typed trait objects registered at startup, not a
//!   string-keyed event registry; the two lifecycle points are explicit
//!   methods with Ok defaults
//! - An empty chain completes immediately with Ok

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::state::{HotState, ResourceCache};

/// Boxed error carried out of a hook.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a hook chain; wraps the failing hook's own error.
#[derive(Debug, Error)]
#[error("hook '{name}' failed: {source}")]
pub struct HookError {
    pub name: &'static str,
    #[source]
    pub source: BoxError,
}

/// A reload lifecycle extension.
///
/// Both methods default to Ok so implementors handle only the lifecycle
/// points they care about.
#[async_trait]
pub trait ReloadHook: Send + Sync {
    /// Stable name, used in error reports and logs.
    fn name(&self) -> &'static str;

    /// Invoked after a new hot snapshot is published.
    async fn on_hot_reload(&self, hot: &HotState) -> Result<(), BoxError> {
        let _ = hot;
        Ok(())
    }

    /// Invoked after the resource cache is rebuilt.
    async fn on_resources_reload(&self, resources: &ResourceCache) -> Result<(), BoxError> {
        let _ = resources;
        Ok(())
    }
}

/// Ordered hook registry, fixed after startup.
#[derive(Clone, Default)]
pub struct HookBus {
    hooks: Vec<Arc<dyn ReloadHook>>,
}

impl HookBus {
    /// Append a hook to the chain. Registration order is invocation
    /// order.
    pub fn register(&mut self, hook: Arc<dyn ReloadHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run the hot-reload chain to completion or first error.
    pub async fn trigger_hot_reload(&self, hot: &HotState) -> Result<(), HookError> {
        for hook in &self.hooks {
            hook.on_hot_reload(hot).await.map_err(|source| HookError {
                name: hook.name(),
                source,
            })?;
        }
        Ok(())
    }

    /// Run the resources-reload chain to completion or first error.
    pub async fn trigger_resources_reload(
        &self,
        resources: &ResourceCache,
    ) -> Result<(), HookError> {
        for hook in &self.hooks {
            hook.on_resources_reload(resources)
                .await
                .map_err(|source| HookError {
                    name: hook.name(),
                    source,
                })?;
        }
        Ok(())
    }
}
