//! Persistence backends.
//!
//! The stores are storage-agnostic: they talk to a [`Persistence`]
//! collaborator that loads and saves whole collections as lists of JSON
//! records. Two backends ship with the storefront:
//!
//! - [`JsonFileStore`] - one `<collection>.json` file per collection in a
//!   data directory (production)
//! - [`MemoryPersistence`] - an in-process map with a failure switch (tests)
//!
//! Writes are whole-collection replaces. A backend must either apply a write
//! completely or report a [`StorageError`]; the stores rely on that to keep
//! their in-memory state unchanged on failure.

mod json_file;
mod memory;

use std::path::PathBuf;

use async_trait::async_trait;
use clear_hearing_core::Collection;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub use json_file::JsonFileStore;
pub use memory::MemoryPersistence;

/// Persistence layer failure.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Records could not be encoded or decoded.
    #[error("serialization error in {collection}: {source}")]
    Serialization {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    /// Backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Load/save contract every backend implements.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Load every record of a collection.
    ///
    /// Returns `Ok(None)` if the collection has never been saved.
    async fn load(&self, collection: Collection) -> Result<Option<Vec<Value>>, StorageError>;

    /// Replace a collection with `records`.
    async fn save_all(&self, collection: Collection, records: Vec<Value>)
    -> Result<(), StorageError>;

    /// Replace several collections together.
    ///
    /// Backends that can stage writes should apply all or none. The default
    /// saves one collection after the other.
    async fn save_many(&self, batch: Vec<(Collection, Vec<Value>)>) -> Result<(), StorageError> {
        for (collection, records) in batch {
            self.save_all(collection, records).await?;
        }
        Ok(())
    }

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Encode records for [`Persistence::save_all`].
///
/// # Errors
///
/// Returns [`StorageError::Serialization`] if a record cannot be encoded.
pub fn encode<T: Serialize>(collection: Collection, records: &[T]) -> Result<Vec<Value>, StorageError> {
    records
        .iter()
        .map(|record| {
            serde_json::to_value(record)
                .map_err(|source| StorageError::Serialization { collection, source })
        })
        .collect()
}

/// Decode records returned by [`Persistence::load`].
///
/// # Errors
///
/// Returns [`StorageError::Serialization`] if a stored record does not match
/// the expected shape.
pub fn decode<T: DeserializeOwned>(
    collection: Collection,
    records: Vec<Value>,
) -> Result<Vec<T>, StorageError> {
    records
        .into_iter()
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|source| StorageError::Serialization { collection, source })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clear_hearing_core::{Category, CategoryId};

    #[test]
    fn test_encode_decode() {
        let categories = vec![Category {
            id: CategoryId::new("1"),
            name: "Hearing aids".to_string(),
            icon: String::new(),
        }];
        let values = encode(Collection::Categories, &categories).unwrap();
        let back: Vec<Category> = decode(Collection::Categories, values).unwrap();
        assert_eq!(back, categories);
    }

    #[test]
    fn test_decode_reports_collection() {
        let err = decode::<Category>(Collection::Categories, vec![serde_json::json!(42)]).unwrap_err();
        assert!(err.to_string().contains("categories"));
    }
}
