use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Result, StateStore, StateStoreError};

/// In-memory state store implementation for testing and local runs.
///
/// Provides the same interface as a real networked store, plus an
/// availability toggle so tests can exercise the transport-error path.
#[derive(Clone)]
pub struct InMemoryStateStore {
    name: String,
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryStateStore {
    /// Creates a new empty store with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Arc::new(RwLock::new(HashMap::new())),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simulates a store outage: while set, every operation fails
    /// with [`StateStoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of entries currently stored.
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StateStoreError::unavailable(&self.name, "connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    fn store_name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check_available()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.check_available()?;
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check_available()?;
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn bulk_set(&self, pairs: Vec<(String, Vec<u8>)>) -> Result<()> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        for (key, value) in pairs {
            entries.insert(key, value);
        }
        Ok(())
    }
}
