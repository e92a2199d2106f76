//! Connection-token signing secret bootstrap.
//!
//! # Responsibilities
//! - Ensure a 32-byte signing secret is present in the live snapshot
//!   after every hot reload
//! - Create the secret at most once across all cooperating processes
//!
//! # Design Decisions
//! - The secret lives hex-encoded in the shared store under a fixed key;
//!   creation uses the store's atomic "create if absent" primitive
//! - A process that loses the creation race re-fetches the winning value
//!   instead of assuming it already holds one; a cold process can lose
//!   the race too
//! - A stored value that is not exactly 32 bytes is a fatal stage error

pub mod store;

pub use store::{MemorySecretStore, RedisSecretStore, SecretStore, StoreError};

use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;
use thiserror::Error;

use crate::hooks::{BoxError, ReloadHook};
use crate::state::{HotState, SECRET_LEN};

/// Fixed store key holding the hex-encoded signing secret.
pub const SECRET_STORE_KEY: &str = "ctoken-secret-key";

#[derive(Debug, Error)]
pub enum SecretError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored value is not valid hex or not 32 bytes.
    #[error("stored signing secret is invalid")]
    InvalidStored,

    /// Lost the creation race, then found no value on re-fetch.
    #[error("signing secret missing after lost bootstrap race")]
    RaceLost,
}

/// Hot-reload hook that adopts the shared signing secret into the live
/// snapshot.
pub struct SecretKeyManager {
    store: Arc<dyn SecretStore>,
}

impl SecretKeyManager {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Fetch the secret, creating it if no process has yet.
    async fn acquire(&self) -> Result<[u8; SECRET_LEN], SecretError> {
        if let Some(stored) = self.store.get(SECRET_STORE_KEY).await? {
            return decode_secret(&stored);
        }

        let mut generated = [0u8; SECRET_LEN];
        OsRng.fill_bytes(&mut generated);

        if self
            .store
            .set_nx(SECRET_STORE_KEY, &hex::encode(generated))
            .await?
        {
            tracing::info!("Generated new connection-token signing secret");
            return Ok(generated);
        }

        // Another process created the key between our get and set_nx;
        // adopt the winning value.
        tracing::debug!("Lost secret creation race, re-fetching winner");
        match self.store.get(SECRET_STORE_KEY).await? {
            Some(stored) => decode_secret(&stored),
            None => Err(SecretError::RaceLost),
        }
    }
}

fn decode_secret(stored: &str) -> Result<[u8; SECRET_LEN], SecretError> {
    let bytes = hex::decode(stored).map_err(|_| SecretError::InvalidStored)?;
    let secret: [u8; SECRET_LEN] = bytes
        .try_into()
        .map_err(|_| SecretError::InvalidStored)?;
    Ok(secret)
}

#[async_trait]
impl ReloadHook for SecretKeyManager {
    fn name(&self) -> &'static str {
        "secret-key"
    }

    async fn on_hot_reload(&self, hot: &HotState) -> Result<(), BoxError> {
        let secret = self.acquire().await?;
        hot.update(|snapshot| snapshot.conn_token_secret = Some(secret));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn adopts_existing_valid_secret() {
        let store = Arc::new(MemorySecretStore::default());
        let existing = [7u8; SECRET_LEN];
        store
            .set_nx(SECRET_STORE_KEY, &hex::encode(existing))
            .await
            .unwrap();

        let hot = HotState::default();
        let manager = SecretKeyManager::new(store);
        manager.on_hot_reload(&hot).await.unwrap();

        assert_eq!(hot.load().conn_token_secret, Some(existing));
    }

    #[tokio::test]
    async fn generates_and_persists_when_absent() {
        let store = Arc::new(MemorySecretStore::default());
        let hot = HotState::default();
        let manager = SecretKeyManager::new(Arc::clone(&store) as Arc<dyn SecretStore>);
        manager.on_hot_reload(&hot).await.unwrap();

        let adopted = hot.load().conn_token_secret.unwrap();
        let stored = store.get(SECRET_STORE_KEY).await.unwrap().unwrap();
        assert_eq!(hex::decode(stored).unwrap(), adopted);
    }

    #[tokio::test]
    async fn wrong_length_stored_secret_is_fatal() {
        let store = Arc::new(MemorySecretStore::default());
        store
            .set_nx(SECRET_STORE_KEY, &hex::encode([1u8; 16]))
            .await
            .unwrap();

        let manager = SecretKeyManager::new(store);
        let err = manager.acquire().await.unwrap_err();
        assert!(matches!(err, SecretError::InvalidStored));
    }

    #[tokio::test]
    async fn secret_is_stable_across_reloads() {
        let store = Arc::new(MemorySecretStore::default());
        let manager = SecretKeyManager::new(store);
        let first = manager.acquire().await.unwrap();
        let second = manager.acquire().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn racing_managers_all_adopt_one_durable_value() {
        let store = Arc::new(MemorySecretStore::default());
        let mut adopted = Vec::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager =
                    SecretKeyManager::new(Arc::clone(&store) as Arc<dyn SecretStore>);
                tokio::spawn(async move { manager.acquire().await })
            })
            .collect();
        for handle in handles {
            adopted.push(handle.await.unwrap().unwrap());
        }

        let stored = store.get(SECRET_STORE_KEY).await.unwrap().unwrap();
        let durable = hex::decode(stored).unwrap();
        for secret in adopted {
            assert_eq!(secret.as_slice(), durable.as_slice());
        }
    }

    /// Store that reports the key absent on first read, then refuses the
    /// create: models losing the race to another cold process.
    struct LosingStore {
        reads: AtomicUsize,
        winner: String,
    }

    #[async_trait]
    impl SecretStore for LosingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            if self.reads.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(None)
            } else {
                Ok(Some(self.winner.clone()))
            }
        }

        async fn set_nx(&self, _key: &str, _value: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn lost_race_refetches_winning_value() {
        let winner = [9u8; SECRET_LEN];
        let manager = SecretKeyManager::new(Arc::new(LosingStore {
            reads: AtomicUsize::new(0),
            winner: hex::encode(winner),
        }));

        let secret = manager.acquire().await.unwrap();
        assert_eq!(secret, winner);
    }

    /// Store where the create is refused and the re-fetch still finds
    /// nothing. The stage must fail rather than run without a secret.
    struct VanishingStore;

    #[async_trait]
    impl SecretStore for VanishingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        async fn set_nx(&self, _key: &str, _value: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn lost_race_with_no_winner_fails_stage() {
        let manager = SecretKeyManager::new(Arc::new(VanishingStore));
        let err = manager.acquire().await.unwrap_err();
        assert!(matches!(err, SecretError::RaceLost));
    }
}
