//! Board server entry point.
//!
//! Loads the static configuration, wires the secret hook to the shared
//! store, runs the initial reload, then keeps reloading whenever the hot
//! config document changes.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use board_server::config::loader::load_config;
use board_server::hooks::HookBus;
use board_server::pipeline::{BundlePipeline, CommandPipeline, NoopPipeline};
use board_server::reload::watcher::ReloadWatcher;
use board_server::reload::Reloader;
use board_server::secret::{
    MemorySecretStore, RedisSecretStore, SecretKeyManager, SecretStore,
};
use board_server::state::State;

#[derive(Parser)]
#[command(name = "board-server", about = "Community board server", long_about = None)]
struct Args {
    /// Path to the static configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Reload once and exit instead of watching for changes.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "board_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("board-server v0.1.0 starting");

    let args = Args::parse();
    let config = Arc::new(load_config(&args.config)?);

    tracing::info!(
        boards = ?config.boards,
        hot_config = ?config.paths.hot_config,
        "Configuration loaded"
    );

    let store: Arc<dyn SecretStore> = match &config.store.url {
        Some(url) => Arc::new(RedisSecretStore::connect(url).await?),
        None => {
            tracing::warn!("No shared store configured; signing secret will not persist");
            Arc::new(MemorySecretStore::default())
        }
    };

    let mut hooks = HookBus::default();
    hooks.register(Arc::new(SecretKeyManager::new(store)));

    let pipeline: Arc<dyn BundlePipeline> = if config.rebuild.command.is_empty() {
        Arc::new(NoopPipeline)
    } else {
        Arc::new(CommandPipeline::new(config.rebuild.command.clone()))
    };

    let reloader = Reloader::new(State::new(hooks), Arc::clone(&config), pipeline);
    reloader.reload().await?;

    if args.once {
        return Ok(());
    }

    let (watcher, mut reload_rx) = ReloadWatcher::new(&config.paths.hot_config);
    let _watcher = watcher.run()?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some(()) = reload_rx.recv() => {
                if let Err(e) = reloader.reload().await {
                    tracing::error!("Reload failed: {}. Keeping current state.", e);
                }
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
