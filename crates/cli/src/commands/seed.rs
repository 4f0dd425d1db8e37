//! Seed default content.
//!
//! Opening the store already writes defaults for collections that have no
//! file yet; this command does that without starting the server and reports
//! what was created.

use std::path::Path;

use tracing::info;

/// Seed the data directory.
///
/// # Errors
///
/// Returns an error if the data directory cannot be read or written.
pub async fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(data_dir).await?;

    if store.seeded().is_empty() {
        info!(path = %data_dir.display(), "Every collection already exists, nothing seeded");
        return Ok(());
    }

    for collection in store.seeded() {
        info!(%collection, "Seeded collection");
    }
    info!(count = store.seeded().len(), "Seeding complete");
    Ok(())
}
