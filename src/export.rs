use crate::rank::ScoredListing;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::path::Path;

/// Save ranked listings with their scores as pretty JSON.
///
/// Uses atomic-write-file so a reader never sees a partially written export.
pub fn save_scored(path: &Path, scored: &[ScoredListing]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, scored).context("Failed to serialize scored listings")?;

    file.commit()
        .with_context(|| format!("Failed to save export to {}", path.display()))?;

    Ok(())
}
