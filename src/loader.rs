//! Reads a dataset file into memory.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Reads the whole file at `path`.
///
/// The bytes are not decoded here. The parser decodes each row as UTF-8 and
/// reports undecodable rows as diagnostics, so one bad row does not fail the load.
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read dataset {}", path.display()))?;
    debug!(bytes = bytes.len(), "Dataset loaded");
    Ok(bytes)
}
