//! Mirror a bumped version into `pyproject.toml`.
//!
//! Supports PEP 621 (`[project]`), the legacy `[metadata]` table and Poetry
//! (`[tool.poetry]`). Formatting and comments are preserved by `toml_edit`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::GrowError;
use crate::project::PYPROJECT;
use crate::version::SemanticVersion;

use super::writer::write_atomic;

/// Table paths that may hold a static `version` key, checked in order.
const VERSION_TABLES: [&[&str]; 3] = [&["project"], &["metadata"], &["tool", "poetry"]];

/// A rendered `pyproject.toml` waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestUpdate {
    pub path: PathBuf,
    content: String,
}

impl ManifestUpdate {
    /// Replace the manifest with the rendered document.
    pub fn write(&self) -> Result<(), GrowError> {
        write_atomic(&self.path, &self.content)
    }
}

/// Render `<root>/pyproject.toml` with `version` as its static version.
///
/// Nothing is written here, so a malformed manifest fails the run before any
/// file changes. `None` when there is no manifest or it declares no static
/// version.
pub fn plan_manifest_update(
    root: &Path,
    version: &SemanticVersion,
) -> Result<Option<ManifestUpdate>, GrowError> {
    let path = root.join(PYPROJECT);
    if !path.is_file() {
        debug!(root = %root.display(), "No pyproject.toml to sync");
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| GrowError::io("read", &path, e))?;
    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| GrowError::Manifest {
            path: path.clone(),
            reason: format!("Invalid TOML: {}", e),
        })?;

    let Some(table) = VERSION_TABLES
        .iter()
        .find(|keys| version_item(&doc, keys).is_some())
    else {
        debug!(path = %path.display(), "Manifest has no static version, leaving it alone");
        return Ok(None);
    };

    let mut item = doc.as_item_mut();
    for key in table.iter() {
        item = &mut item[*key];
    }
    item["version"] = toml_edit::value(version.to_string());

    Ok(Some(ManifestUpdate {
        path,
        content: doc.to_string(),
    }))
}

fn version_item<'a>(doc: &'a toml_edit::DocumentMut, keys: &[&str]) -> Option<&'a toml_edit::Item> {
    let mut item = doc.as_item();
    for key in keys {
        item = item.get(key)?;
    }
    item.get("version").filter(|v| v.is_str())
}
