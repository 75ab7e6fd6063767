use crate::error::{EtlError, Result};
use std::fs;
use std::path::Path;

/// Read the newline-delimited endpoint list, one trimmed URL per line.
///
/// The file is re-read on every call.
pub fn load_urls(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| EtlError::io(path, e))?;
    Ok(content.lines().map(|line| line.trim().to_string()).collect())
}
