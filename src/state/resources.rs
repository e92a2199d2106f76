//! Precompiled resource cache.
//!
//! Derived, ready-to-serve page material keyed by resource name. Unlike
//! the hot snapshot, reloads are additive: a rebuild overwrites the keys
//! it produces and never deletes the rest.

use dashmap::DashMap;
use std::sync::Arc;

use crate::templates::CompiledTemplate;

/// Well-known resource cache keys.
pub mod keys {
    pub const INDEX: &str = "index";
    pub const INDEX_HASH: &str = "index_hash";
    pub const FILTER: &str = "filter";
    pub const CURFEW: &str = "curfew";
    pub const SUSPENSION: &str = "suspension";
    pub const TEAWAY: &str = "teaway";
    pub const MANUAL: &str = "manual";
    pub const NOT_FOUND: &str = "not_found";
    pub const SERVER_ERROR: &str = "server_error";
    pub const NAVIGATION: &str = "navigation";
    pub const MOD_JS: &str = "mod_js";
}

/// A single cached resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Precompiled template, served by filling its slots.
    Template(CompiledTemplate),
    /// Static text, served verbatim.
    Text(String),
}

/// Cloneable handle to the process-wide resource cache.
#[derive(Clone, Default)]
pub struct ResourceCache {
    inner: Arc<DashMap<String, Resource>>,
}

impl ResourceCache {
    /// Insert or overwrite a resource.
    pub fn insert(&self, name: &str, resource: Resource) {
        self.inner.insert(name.to_string(), resource);
    }

    /// Fetch a resource by name.
    pub fn get(&self, name: &str) -> Option<Resource> {
        self.inner.get(name).map(|entry| entry.value().clone())
    }

    /// Fetch a text resource; None if absent or not text.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Resource::Text(s) => Some(s),
            Resource::Template(_) => None,
        }
    }

    /// Fetch a template resource; None if absent or not a template.
    pub fn template(&self, name: &str) -> Option<CompiledTemplate> {
        match self.get(name)? {
            Resource::Template(t) => Some(t),
            Resource::Text(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_is_additive() {
        let cache = ResourceCache::default();
        cache.insert(keys::MOD_JS, Resource::Text("old".into()));
        cache.insert(keys::NAVIGATION, Resource::Text("<nav>[]</nav>".into()));

        // A later build that only touches mod_js leaves navigation alone.
        cache.insert(keys::MOD_JS, Resource::Text("new".into()));
        assert_eq!(cache.text(keys::MOD_JS).as_deref(), Some("new"));
        assert_eq!(
            cache.text(keys::NAVIGATION).as_deref(),
            Some("<nav>[]</nav>")
        );
    }

    #[test]
    fn typed_accessors_reject_mismatched_kinds() {
        let cache = ResourceCache::default();
        cache.insert(keys::NOT_FOUND, Resource::Text("gone".into()));
        assert!(cache.template(keys::NOT_FOUND).is_none());
        assert!(cache.text(keys::NOT_FOUND).is_some());
    }
}
