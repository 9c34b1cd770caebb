//! Cleanup of the flat-file generation's storage.
//!
//! Before records moved to SQLite, every card (images included, base64 encoded)
//! was serialized as one JSON array under the `savedCards` key. Those files are
//! deleted on open. They are never imported.

use crate::error::{DearlyError, Result};
use crate::paths::DearlyPaths;
use std::fs;
use std::io::ErrorKind;
use tracing::{info, warn};

/// Deletes the root's `savedCards.json` if present.
///
/// Returns `Some(n)` with the number of records the blob held (0 if unreadable)
/// when a file was removed, `None` when there was nothing to do.
pub fn remove_legacy_blob(paths: &DearlyPaths) -> Result<Option<usize>> {
    let path = paths.legacy_blob();
    let content = match fs::read(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(DearlyError::Io(e)),
    };

    let records = match serde_json::from_slice::<Vec<serde_json::Value>>(&content) {
        Ok(cards) => cards.len(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "legacy card blob is not a JSON array");
            0
        }
    };

    fs::remove_file(&path).map_err(DearlyError::Io)?;
    info!(records, path = %path.display(), "removed legacy card blob");
    Ok(Some(records))
}
