//! In-process backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use clear_hearing_core::Collection;
use serde_json::Value;

use super::{Persistence, StorageError};

/// Keeps collections in a map. Writes can be made to fail on demand, which
/// is how tests exercise the no-partial-write guarantees.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    collections: Mutex<HashMap<Collection, Vec<Value>>>,
    fail_writes: AtomicBool,
}

impl MemoryPersistence {
    /// An empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw stored records of a collection, for assertions.
    #[must_use]
    pub fn stored(&self, collection: Collection) -> Option<Vec<Value>> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&collection)
            .cloned()
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn load(&self, collection: Collection) -> Result<Option<Vec<Value>>, StorageError> {
        Ok(self.stored(collection))
    }

    async fn save_all(&self, collection: Collection, records: Vec<Value>) -> Result<(), StorageError> {
        self.check_writable()?;
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(collection, records);
        Ok(())
    }

    async fn save_many(&self, batch: Vec<(Collection, Vec<Value>)>) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        collections.extend(batch);
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
