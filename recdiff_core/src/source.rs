//! Record acquisition.
//!
//! One-shot blocking reads; the comparison engines themselves never
//! touch the filesystem. A missing or empty source is reported before
//! any comparison starts, never mid-comparison.

use recdiff_common::{RecDiffError, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Load delimited text records from a file, one per line. Lines are
/// trimmed of surrounding whitespace; blank lines are dropped.
pub fn load_text_records(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(RecDiffError::source_unavailable(path, "file not found"));
    }

    let data = fs::read_to_string(path)?;
    let records: Vec<String> = data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if records.is_empty() {
        return Err(RecDiffError::source_unavailable(path, "no records"));
    }

    info!(path = %path.display(), records = records.len(), "loaded text records");
    Ok(records)
}

/// Load a binary record buffer whole.
pub fn load_binary(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(RecDiffError::source_unavailable(path, "file not found"));
    }

    let data = fs::read(path)?;
    if data.is_empty() {
        return Err(RecDiffError::source_unavailable(path, "empty file"));
    }

    info!(path = %path.display(), bytes = data.len(), "loaded binary buffer");
    Ok(data)
}
