use async_trait::async_trait;

use crate::Result;

/// Core trait for keyed state store clients.
///
/// Keys are scoped to a named store; values are opaque bytes. Writes
/// are single-key and last-writer-wins. No multi-key atomicity is
/// assumed: `bulk_set` batches writes into one call but does not make
/// them transactional.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Returns the name of the store this client is scoped to.
    fn store_name(&self) -> &str;

    /// Retrieves the value for a key, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes a value under a key, overwriting any existing value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Deletes the entry for a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Writes several key/value pairs in a single operation.
    async fn bulk_set(&self, pairs: Vec<(String, Vec<u8>)>) -> Result<()>;

    /// Probes the store for reachability.
    async fn ping(&self) -> Result<()> {
        self.get("_ping").await.map(|_| ())
    }
}
