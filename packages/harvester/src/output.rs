//! File output: atomic writes and JSON generation for extracted records.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{HarvesterError, Result};
use crate::types::ExtractedRecord;

/// Write `content` to `dest` via a temp file in the same directory.
///
/// Writes to `.{name}.tmp`, syncs to disk, then renames over `dest`, so a
/// crash never leaves a half-written destination.
pub(crate) fn write_atomic(dest: &Path, content: &[u8]) -> std::io::Result<()> {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = dest.with_file_name(format!(".{name}.tmp"));

    {
        let mut file = File::create(&temp)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if dest.exists() {
        fs::remove_file(dest)?;
    }

    fs::rename(&temp, dest)
}

/// Serialize records as a pretty-printed JSON array.
pub fn generate_json(records: &[ExtractedRecord]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    Ok(json)
}

/// Save records as a JSON file, creating parent directories as needed.
pub fn save_json(records: &[ExtractedRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| HarvesterError::at_path(parent, e))?;
    }

    let content = generate_json(records)?;
    write_atomic(path, content.as_bytes()).map_err(|e| HarvesterError::at_path(path, e))
}
