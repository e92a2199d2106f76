//! Shared key-value store backends for secret bootstrap.
//!
//! The only cross-process primitive the reload subsystem needs is an
//! atomic "create if absent" write, so the seam is a two-method trait.

use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Mutex;
use thiserror::Error;

/// Store access failure.
#[derive(Debug, Error)]
#[error("store error: {0}")]
pub struct StoreError(String);

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError(err.to_string())
    }
}

/// Minimal shared-store contract: read a value, and atomically create
/// one if absent.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the value under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Atomically write `value` under `key` only if the key is absent.
    /// Returns true when this call created the key.
    async fn set_nx(&self, key: &str, value: &str) -> Result<bool, StoreError>;
}

/// Redis-backed store, shared across cooperating server processes.
pub struct RedisSecretStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisSecretStore {
    /// Connect to the store. Fails fast when the store is unreachable.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        tracing::debug!(url, "Connected to shared store");
        Ok(Self { conn })
    }
}

#[async_trait]
impl SecretStore for RedisSecretStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    async fn set_nx(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let created: i64 = redis::cmd("SETNX")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(created == 1)
    }
}

/// In-process store. Backs tests and storeless runs; values do not
/// survive the process.
#[derive(Default)]
pub struct MemorySecretStore {
    inner: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().unwrap().get(key).cloned())
    }

    async fn set_nx(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        match self.inner.lock().unwrap().entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value.to_string());
                Ok(true)
            }
        }
    }
}
