//! Atomic file replacement.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::GrowError;

/// Replace `path` with `content` so readers see either the old or the new file.
///
/// The content goes to a temporary file in the same directory, is flushed to
/// disk, takes over the original's permissions and is then renamed over
/// `path`. A symlinked `path` is resolved first.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GrowError> {
    let resolved;
    let path = if path.exists() {
        resolved = std::fs::canonicalize(path).map_err(|e| GrowError::io("resolve", path, e))?;
        resolved.as_path()
    } else {
        path
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| GrowError::io("create a temporary file next to", path, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| GrowError::io("write", tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| GrowError::io("flush", tmp.path(), e))?;

    if let Ok(metadata) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| GrowError::io("copy permissions to", tmp.path(), e))?;
    }

    tmp.persist(path)
        .map_err(|e| GrowError::io("replace", path, e.error))?;

    Ok(())
}
