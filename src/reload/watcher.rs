//! Hot-config file watcher.
//!
//! Watches the hot configuration document and requests a reload when it
//! changes. The watcher only signals; the pipeline itself runs in the
//! caller's loop, so a failed reload keeps the current state.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// A watcher that requests reloads on hot-config changes.
pub struct ReloadWatcher {
    path: PathBuf,
    reload_tx: mpsc::UnboundedSender<()>,
}

impl ReloadWatcher {
    /// Create a new ReloadWatcher.
    ///
    /// Returns the watcher and a receiver for reload requests.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (reload_tx, reload_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                reload_tx,
            },
            reload_rx,
        )
    }

    /// Start watching the file in a background thread.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.reload_tx.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Hot config change detected, requesting reload");
                        let _ = tx.send(());
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Hot config watcher started");
        Ok(watcher)
    }
}
