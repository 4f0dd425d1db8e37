//! CLI command implementations.

pub mod export;
pub mod import;
pub mod seed;

use std::path::Path;
use std::sync::Arc;

use clear_hearing_storefront::persistence::JsonFileStore;
use clear_hearing_storefront::store::{Store, StoreError};

/// Open the store backed by the JSON files in `data_dir`.
async fn open_store(data_dir: &Path) -> Result<Store, StoreError> {
    let persistence = JsonFileStore::open(data_dir).await?;
    Store::open(Arc::new(persistence)).await
}
