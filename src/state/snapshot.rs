//! Live hot-configuration snapshot.
//!
//! # Data Flow
//! ```text
//! hot.toml → reload::hot (parse & validate)
//!     → HotSnapshot (immutable value)
//!     → HotState::publish (single atomic pointer store)
//!     → readers observe the new snapshot all-or-nothing
//! ```
//!
//! # Design Decisions
//! - The snapshot is an immutable value behind `ArcSwap`; readers never
//!   see a partially updated mapping
//! - A reload replaces the key set wholesale; keys absent from the new
//!   document do not survive
//! - Post-publication merges (ban list, bundle ids, signing secret) are
//!   read-copy-update swaps of the same pointer

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use toml::Value;

/// Length of the connection-token signing secret in bytes.
pub const SECRET_LEN: usize = 32;

/// One immutable generation of the hot configuration.
#[derive(Debug, Clone, Default)]
pub struct HotSnapshot {
    /// Free-form hot settings, exactly the keys of the `[hot]` table.
    pub values: HashMap<String, Value>,

    /// Banned/excluded IPv4 addresses; seeded from the hot document's
    /// `bans` key, extended by the exclusion file. Append-only within a
    /// generation, deduplicated.
    pub bans: Vec<String>,

    /// Generated vendor bundle identifier.
    pub vendor_js: Option<String>,

    /// Generated client bundle identifier.
    pub client_js: Option<String>,

    /// Connection-token signing secret, adopted by the secret hook.
    pub conn_token_secret: Option<[u8; SECRET_LEN]>,
}

impl HotSnapshot {
    /// Build a snapshot from a parsed `[hot]` table. The `bans` key, when
    /// it is an array of strings, seeds the ban list.
    pub fn from_table(table: toml::value::Table) -> Self {
        let values: HashMap<String, Value> = table.into_iter().collect();
        let bans = match values.get("bans") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        Self {
            values,
            bans,
            ..Default::default()
        }
    }

    /// Whether inter-board navigation is enabled for this generation.
    pub fn navigation_enabled(&self) -> bool {
        matches!(
            self.values.get("inter_board_navigation"),
            Some(Value::Boolean(true))
        )
    }
}

/// Render a hot value for template interpolation. Strings render bare;
/// everything else uses its TOML literal form.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Cloneable handle to the live snapshot.
#[derive(Clone, Default)]
pub struct HotState {
    inner: Arc<ArcSwap<HotSnapshot>>,
}

impl HotState {
    /// Current snapshot.
    pub fn load(&self) -> Arc<HotSnapshot> {
        self.inner.load_full()
    }

    /// Replace the live snapshot in one atomic store.
    pub fn publish(&self, snapshot: HotSnapshot) {
        self.inner.store(Arc::new(snapshot));
    }

    /// Merge a change into the live snapshot via read-copy-update.
    pub fn update(&self, f: impl Fn(&mut HotSnapshot)) {
        self.inner.rcu(|current| {
            let mut next = HotSnapshot::clone(current);
            f(&mut next);
            next
        });
    }
}
