//! Snapshot export.

use std::io::Write;
use std::path::Path;

use tracing::info;

/// Write the store as one JSON document to `out`, or to stdout.
///
/// # Errors
///
/// Returns an error if the data directory cannot be loaded or the output
/// cannot be written.
pub async fn run(
    data_dir: &Path,
    out: Option<&Path>,
    include_orders: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(data_dir).await?;
    let snapshot = store.export_snapshot(include_orders);
    let json = serde_json::to_string_pretty(&snapshot)?;

    match out {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            info!(
                path = %path.display(),
                records = snapshot.record_count(),
                include_orders,
                "Snapshot exported"
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}
