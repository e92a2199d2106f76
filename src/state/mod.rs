//! Process-wide mutable state: the live hot-configuration snapshot and
//! the precompiled resource cache, plus the hook bus that extends reload
//! behavior.
//!
//! Both handles are cheap to clone and safe to read from any task; only
//! the reload pipeline writes to them.

pub mod resources;
pub mod snapshot;

pub use resources::{Resource, ResourceCache};
pub use snapshot::{HotSnapshot, HotState, SECRET_LEN};

use crate::hooks::HookBus;

/// The shared state operated on by the reload pipeline.
#[derive(Clone, Default)]
pub struct State {
    /// Live hot-configuration snapshot.
    pub hot: HotState,

    /// Precompiled resource cache.
    pub resources: ResourceCache,

    /// Reload extension hooks, fixed after startup.
    pub hooks: HookBus,
}

impl State {
    /// Create empty state with the given hook registrations.
    pub fn new(hooks: HookBus) -> Self {
        Self {
            hot: HotState::default(),
            resources: ResourceCache::default(),
            hooks,
        }
    }
}
