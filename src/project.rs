//! Project discovery and manifest metadata.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ProjectError;
use crate::registry::PackageRegistry;

/// Files whose presence marks a project root.
pub const MANIFEST_FILES: [&str; 2] = ["pyproject.toml", "setup.py"];

/// The manifest that carries project metadata.
pub const PYPROJECT: &str = "pyproject.toml";

/// Process state the `grow` pipeline depends on, passed in explicitly.
///
/// Nothing below the CLI reads the real working directory or environment,
/// so several contexts can run side by side in one process.
pub struct ProjectContext<'a> {
    pub cwd: PathBuf,
    pub registry: &'a dyn PackageRegistry,
}

impl<'a> ProjectContext<'a> {
    pub fn new(cwd: impl Into<PathBuf>, registry: &'a dyn PackageRegistry) -> Self {
        Self {
            cwd: cwd.into(),
            registry,
        }
    }

    /// Resolve a possibly relative path against the context's working directory.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Project root containing the working directory.
    pub fn project_root(&self) -> Result<PathBuf, ProjectError> {
        find_project_root(&self.cwd)
    }
}

/// Find the nearest ancestor of `start` (inclusive) holding a manifest.
pub fn find_project_root(start: &Path) -> Result<PathBuf, ProjectError> {
    for dir in start.ancestors() {
        if MANIFEST_FILES.iter().any(|name| dir.join(name).is_file()) {
            debug!(root = %dir.display(), "Found project root");
            return Ok(dir.to_path_buf());
        }
    }

    Err(ProjectError::NotFound(start.to_path_buf()))
}

/// Read the project name declared in `<dir>/pyproject.toml`.
///
/// Checks `[project].name` (PEP 621), then `[metadata].name`, then
/// `[tool.poetry].name`. A missing manifest or missing name is `Ok(None)`.
pub fn read_project_name(dir: &Path) -> Result<Option<String>, ProjectError> {
    let path = dir.join(PYPROJECT);
    if !path.is_file() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ProjectError::ManifestRead {
        path: path.clone(),
        source,
    })?;
    let doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| ProjectError::ManifestParse {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    let name = doc
        .get("project")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .or_else(|| {
            doc.get("metadata")
                .and_then(|m| m.get("name"))
                .and_then(|n| n.as_str())
        })
        .or_else(|| {
            doc.get("tool")
                .and_then(|t| t.get("poetry"))
                .and_then(|p| p.get("name"))
                .and_then(|n| n.as_str())
        });

    Ok(name.map(String::from))
}

/// Project name for `dir`: the manifest name, else the directory name.
pub fn project_name(dir: &Path) -> Result<String, ProjectError> {
    if let Some(name) = read_project_name(dir)? {
        return Ok(normalize_package_name(&name));
    }

    let base = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(normalize_package_name(&base))
}

/// Normalise a distribution name to its importable form: runs of `-`, `_`
/// and `.` become one `_`, and the result is lowercased.
pub fn normalize_package_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('_');
            }
            in_separator = true;
        } else {
            normalized.extend(c.to_lowercase());
            in_separator = false;
        }
    }

    normalized
}
