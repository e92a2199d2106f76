//! Resource build stage.
//!
//! Reads the template set concurrently, expands and precompiles the
//! dynamic pages against the layered configuration context, fingerprints
//! the index, stores static fallbacks verbatim, and rebuilds navigation
//! markup. Finishes by running the resources-reload hook chain.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

use crate::config::ServerConfig;
use crate::hooks::HookError;
use crate::state::resources::keys;
use crate::state::snapshot::render_value;
use crate::state::{HotSnapshot, Resource, State};
use crate::templates;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Hook(#[from] HookError),
}

async fn read_doc(path: PathBuf) -> Result<String, ResourceError> {
    fs::read_to_string(&path)
        .await
        .map_err(|source| ResourceError::Read { path, source })
}

/// Run the resource-build stage against the given state.
pub async fn build_resources(state: &State, config: &ServerConfig) -> Result<(), ResourceError> {
    let tmpl = |name: &str| config.paths.tmpl_dir.join(name);
    let www = |name: &str| config.paths.www_dir.join(name);

    // Fan-out reads; the first failure fails the whole stage.
    let (index, filter, curfew, suspension, teaway, manual, not_found, server_error) =
        tokio::try_join!(
            read_doc(tmpl("index.html")),
            read_doc(tmpl("filter.html")),
            read_doc(tmpl("curfew.html")),
            read_doc(tmpl("suspension.html")),
            read_doc(tmpl("teaway.html")),
            read_doc(tmpl("manual.html")),
            read_doc(www("404.html")),
            read_doc(www("50x.html")),
        )?;

    let snapshot = state.hot.load();
    let ctx = build_context(&snapshot, config);

    for (key, source) in [
        (keys::FILTER, &filter),
        (keys::CURFEW, &curfew),
        (keys::SUSPENSION, &suspension),
    ] {
        let expanded = templates::expand(source, &ctx);
        state
            .resources
            .insert(key, Resource::Template(templates::parse(&expanded)));
    }

    let index_expanded = templates::expand(&index, &ctx);
    state.resources.insert(
        keys::INDEX,
        Resource::Template(templates::parse(&index_expanded)),
    );
    let hash = fingerprint(&index_expanded);
    state
        .resources
        .insert(keys::INDEX_HASH, Resource::Text(hash.clone()));

    // Static fallbacks are served verbatim, unexpanded.
    for (key, text) in [
        (keys::TEAWAY, teaway),
        (keys::MANUAL, manual),
        (keys::NOT_FOUND, not_found),
        (keys::SERVER_ERROR, server_error),
    ] {
        state.resources.insert(key, Resource::Text(text));
    }

    state.resources.insert(
        keys::NAVIGATION,
        Resource::Text(navigation_html(config, &snapshot)),
    );

    tracing::info!(index_hash = %hash, resources = state.resources.len(), "Resources rebuilt");

    state
        .hooks
        .trigger_resources_reload(&state.resources)
        .await?;
    Ok(())
}

/// Build the template context. Later layers win on key collision: hot
/// snapshot values, then imager config, then static site config.
pub fn build_context(snapshot: &HotSnapshot, config: &ServerConfig) -> HashMap<String, String> {
    let mut ctx = HashMap::new();
    for (key, value) in &snapshot.values {
        ctx.insert(key.clone(), render_value(value));
    }
    overlay(&mut ctx, &config.imager);
    overlay(&mut ctx, &config.site);
    ctx
}

/// Flatten a config section's top-level fields into the context.
fn overlay<T: Serialize>(ctx: &mut HashMap<String, String>, layer: &T) {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(layer) {
        for (key, value) in fields {
            let rendered = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            ctx.insert(key, rendered);
        }
    }
}

/// SHA-256 of the expanded text, truncated to its first 8 hex chars;
/// used as the cache-busting version stamp.
pub fn fingerprint(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(digest)[..8].to_string()
}

/// Inter-board navigation markup. Empty when disabled; otherwise the
/// configured boards in order, staff board skipped, joined as anchors.
pub fn navigation_html(config: &ServerConfig, snapshot: &HotSnapshot) -> String {
    if !snapshot.navigation_enabled() {
        return String::new();
    }
    let mut html = String::from("<nav>[");
    let mut first = true;
    for board in &config.boards {
        if *board == config.staff_board {
            continue;
        }
        if !first {
            html.push_str(" / ");
        }
        html.push_str(&format!("<a href=\"../{board}/\">{board}</a>"));
        first = false;
    }
    html.push_str("]</nav>");
    html
}
