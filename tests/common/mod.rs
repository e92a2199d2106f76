//! Shared fixtures for reload pipeline integration tests.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use board_server::config::ServerConfig;
use board_server::hooks::HookBus;
use board_server::pipeline::NoopPipeline;
use board_server::reload::Reloader;
use board_server::secret::{MemorySecretStore, SecretKeyManager, SecretStore};
use board_server::state::State;
use tempfile::TempDir;

pub const HOT_TOML: &str = r#"
[hot]
title = "Hot Board"
curfew_end = "06:00"
inter_board_navigation = true
bans = ["9.9.9.9"]
"#;

pub const SCRIPTS_JSON: &str =
    r#"{"vendor": "vendor-1a2b.js", "client": "client-3c4d.js", "mod": "mod-5e6f.js"}"#;

/// Lay out a complete site directory: hot config, exits, templates,
/// static pages, and the generated-script manifest.
pub fn site_fixture() -> (TempDir, ServerConfig) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(root, "hot.toml", HOT_TOML);
    write(root, "exits.txt", "1.2.3.4\n#1 5.6.7.8\nnot an ip\n");

    write(
        root,
        "tmpl/index.html",
        "<title>{{title}}</title>$THREADS<footer>{{media_url}}</footer>",
    );
    write(root, "tmpl/filter.html", "<ul>$FILTERS</ul>");
    write(root, "tmpl/curfew.html", "<p>Curfew until {{curfew_end}}</p>");
    write(root, "tmpl/suspension.html", "<p>$REASON</p>");
    write(root, "tmpl/teaway.html", "<p>{{title}} teaway</p>");
    write(root, "tmpl/manual.html", "<h1>Manual</h1>");
    write(root, "www/404.html", "<h1>404</h1>");
    write(root, "www/50x.html", "<h1>50x</h1>");

    write(root, "state/scripts.json", SCRIPTS_JSON);
    write(root, "state/mod-5e6f.js", "// moderation bundle\n");

    let mut config = ServerConfig {
        boards: vec!["a".into(), "b".into(), "staff".into()],
        staff_board: "staff".into(),
        ..Default::default()
    };
    config.paths.hot_config = root.join("hot.toml");
    config.paths.exits = root.join("exits.txt");
    config.paths.tmpl_dir = root.join("tmpl");
    config.paths.www_dir = root.join("www");
    config.paths.state_dir = root.join("state");

    (dir, config)
}

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Reloader wired with the in-memory store and a no-op bundle pipeline.
pub fn reloader(config: ServerConfig, store: Arc<MemorySecretStore>) -> Reloader {
    let mut hooks = HookBus::default();
    hooks.register(Arc::new(SecretKeyManager::new(
        store as Arc<dyn SecretStore>,
    )));
    Reloader::new(State::new(hooks), Arc::new(config), Arc::new(NoopPipeline))
}
