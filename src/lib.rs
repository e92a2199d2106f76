//! Community Board Server — hot-reload subsystem.
//!
//! Refreshes live runtime configuration and regenerates precompiled page
//! resources without restarting the process, and bootstraps the shared
//! signing secret used to validate connection tokens.
//!
//! # Architecture Overview
//!
//! ```text
//! Reloader::reload()
//!     │
//!     ├─▶ hot config stage ──▶ HotState (atomic snapshot swap)
//!     │        └─▶ HookBus ──▶ SecretKeyManager ──▶ shared store
//!     ├─▶ bundle rebuild (collaborator trait)
//!     ├─▶ script manifest stage ──▶ snapshot + resource cache
//!     └─▶ resource build stage ──▶ ResourceCache (precompiled pages)
//!              └─▶ HookBus
//! ```

// Core subsystems
pub mod config;
pub mod reload;
pub mod state;
pub mod templates;

// Cross-cutting concerns
pub mod hooks;
pub mod pipeline;
pub mod secret;

pub use config::ServerConfig;
pub use reload::{ReloadError, Reloader};
pub use state::State;
