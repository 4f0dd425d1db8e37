//! Snapshot import.
//!
//! Collections present in the file replace the stored ones; absent
//! collections are left alone. Nothing is written if the file is invalid.

use std::path::Path;

use clear_hearing_core::{Collection, Snapshot};
use tracing::info;

/// Import the snapshot at `file` into the store at `data_dir`.
///
/// # Errors
///
/// Returns an error if the file is missing, is not a valid snapshot, or the
/// data directory cannot be written.
pub async fn run(data_dir: &Path, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let content = tokio::fs::read_to_string(file).await?;
    let snapshot = Snapshot::parse(&content)?;
    info!(records = snapshot.record_count(), "Parsed snapshot");

    let store = super::open_store(data_dir).await?;
    let summary = store.import_snapshot(snapshot).await?;

    let collections: Vec<&str> = summary.collections.iter().map(Collection::as_str).collect();
    info!(
        collections = %collections.join(", "),
        records = summary.records,
        "Snapshot imported"
    );
    Ok(())
}
