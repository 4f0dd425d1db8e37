//! JSON file backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use clear_hearing_core::Collection;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{Persistence, StorageError};

/// Stores each collection as a pretty-printed JSON array in
/// `<data_dir>/<collection>.json`.
///
/// Writes go to a `.tmp` sibling first and are renamed into place, so a
/// crash mid-write leaves the previous file intact. Batches keep a `.bak`
/// copy of every file they replace until all renames succeed, and put the
/// copies back if one fails.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a data directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| io_error(&dir, source))?;
        Ok(Self { dir })
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.as_str()))
    }

    fn temp_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", collection.as_str()))
    }

    fn backup_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json.bak", collection.as_str()))
    }

    /// Copy the current file aside. `None` when there is no file to keep.
    async fn backup(&self, collection: Collection) -> Result<Option<PathBuf>, StorageError> {
        let path = self.path(collection);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                let backup = self.backup_path(collection);
                tokio::fs::copy(&path, &backup)
                    .await
                    .map_err(|source| io_error(&backup, source))?;
                Ok(Some(backup))
            }
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(io_error(&path, source)),
        }
    }

    /// Put back what `backup` saved, or remove a file that did not exist
    /// before the batch.
    async fn restore(&self, collection: Collection, backup: Option<&PathBuf>) {
        let path = self.path(collection);
        let result = match backup {
            Some(backup) => tokio::fs::rename(backup, &path).await,
            None => tokio::fs::remove_file(&path).await,
        };
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "Failed to roll back collection file");
        }
    }

    async fn stage(&self, collection: Collection, records: &[Value]) -> Result<PathBuf, StorageError> {
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|source| StorageError::Serialization { collection, source })?;
        let temp = self.temp_path(collection);
        tokio::fs::write(&temp, bytes)
            .await
            .map_err(|source| io_error(&temp, source))?;
        Ok(temp)
    }

    async fn publish(&self, collection: Collection, temp: &Path) -> Result<(), StorageError> {
        let path = self.path(collection);
        tokio::fs::rename(temp, &path)
            .await
            .map_err(|source| io_error(&path, source))
    }
}

/// Remove leftover staging or backup files, logging what cannot be removed.
async fn discard<'a>(paths: impl Iterator<Item = &'a PathBuf>) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove leftover file");
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait]
impl Persistence for JsonFileStore {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn load(&self, collection: Collection) -> Result<Option<Vec<Value>>, StorageError> {
        let path = self.path(collection);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(io_error(&path, source)),
        };

        let records: Vec<Value> = serde_json::from_slice(&bytes)
            .map_err(|source| StorageError::Serialization { collection, source })?;
        debug!(count = records.len(), "Loaded collection");
        Ok(Some(records))
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn save_all(&self, collection: Collection, records: Vec<Value>) -> Result<(), StorageError> {
        let temp = self.stage(collection, &records).await?;
        self.publish(collection, &temp).await
    }

    #[instrument(skip(self, batch), fields(collections = batch.len()))]
    async fn save_many(&self, batch: Vec<(Collection, Vec<Value>)>) -> Result<(), StorageError> {
        let mut staged = Vec::with_capacity(batch.len());
        for (collection, records) in &batch {
            match self.stage(*collection, records).await {
                Ok(temp) => staged.push((*collection, temp)),
                Err(e) => {
                    discard(staged.iter().map(|(_, temp)| temp)).await;
                    return Err(e);
                }
            }
        }

        let mut backups = Vec::with_capacity(staged.len());
        for (collection, _) in &staged {
            match self.backup(*collection).await {
                Ok(backup) => backups.push(backup),
                Err(e) => {
                    discard(staged.iter().map(|(_, temp)| temp)).await;
                    discard(backups.iter().flatten()).await;
                    return Err(e);
                }
            }
        }

        for (published, (collection, temp)) in staged.iter().enumerate() {
            if let Err(e) = self.publish(*collection, temp).await {
                for ((collection, _), backup) in staged.iter().zip(&backups).take(published) {
                    self.restore(*collection, backup.as_ref()).await;
                }
                discard(staged.iter().skip(published).map(|(_, temp)| temp)).await;
                discard(backups.iter().skip(published).flatten()).await;
                return Err(e);
            }
        }

        discard(backups.iter().flatten()).await;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json files in {}", self.dir.display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("clear-hearing-test-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_missing_collection_is_none() {
        let store = JsonFileStore::open(temp_dir()).await.unwrap();
        assert!(store.load(Collection::Products).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = temp_dir();
        let store = JsonFileStore::open(&dir).await.unwrap();
        let records = vec![json!({"id": "1", "name": "Hearing aids"})];

        store
            .save_all(Collection::Categories, records.clone())
            .await
            .unwrap();

        assert_eq!(
            store.load(Collection::Categories).await.unwrap(),
            Some(records)
        );
        assert!(!dir.join("categories.json.tmp").exists());
        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_many_writes_every_collection() {
        let dir = temp_dir();
        let store = JsonFileStore::open(&dir).await.unwrap();
        store
            .save_many(vec![
                (Collection::Categories, vec![]),
                (Collection::Products, vec![json!({"id": "p1"})]),
            ])
            .await
            .unwrap();

        assert_eq!(store.load(Collection::Categories).await.unwrap(), Some(vec![]));
        assert_eq!(
            store.load(Collection::Products).await.unwrap().map(|r| r.len()),
            Some(1)
        );
        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = temp_dir();
        let store = JsonFileStore::open(&dir).await.unwrap();
        tokio::fs::write(dir.join("orders.json"), b"{not json").await.unwrap();

        let err = store.load(Collection::Orders).await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization { .. }));
        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_many_rolls_back_when_a_rename_fails() {
        let dir = temp_dir();
        let store = JsonFileStore::open(&dir).await.unwrap();
        let original = vec![json!({"id": "1", "name": "Hearing aids"})];
        store
            .save_all(Collection::Categories, original.clone())
            .await
            .unwrap();
        // A non-empty directory in place of products.json makes its rename fail.
        tokio::fs::create_dir_all(dir.join("products.json/blocker"))
            .await
            .unwrap();

        let result = store
            .save_many(vec![
                (Collection::Categories, vec![]),
                (Collection::Products, vec![json!({"id": "p1"})]),
            ])
            .await;

        assert!(matches!(result, Err(StorageError::Io { .. })));
        assert_eq!(
            store.load(Collection::Categories).await.unwrap(),
            Some(original)
        );
        for leftover in [
            "categories.json.tmp",
            "categories.json.bak",
            "products.json.tmp",
            "products.json.bak",
        ] {
            assert!(!dir.join(leftover).exists(), "{leftover} left behind");
        }
        tokio::fs::remove_dir_all(dir).await.unwrap();
    }
}
