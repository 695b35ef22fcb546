//! Package directory resolution.
//!
//! The directory whose version file `grow` rewrites comes from, in order:
//! an explicit file or directory path, an editable package name, or a search
//! of the project root.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::GrowError;
use crate::project::{ProjectContext, project_name};

use super::locator::{self, FileRank};

/// Layout directory whose children are packages.
const SRC_DIR: &str = "src";

/// The directory holding the package to bump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRoot {
    pub directory: PathBuf,
    pub project_name: String,
    /// Set when the caller named the version file itself.
    pub version_file: Option<PathBuf>,
    /// Directory the search started from, scanned for diagnostics on failure.
    pub search_base: PathBuf,
}

/// Resolve the package directory for one `grow` invocation.
///
/// An explicit path wins over a package name; with neither, the project
/// root of `ctx.cwd` is searched.
pub fn resolve(
    ctx: &ProjectContext<'_>,
    explicit_path: Option<&Path>,
    package_name: Option<&str>,
) -> Result<PackageRoot, GrowError> {
    if let Some(path) = explicit_path {
        let path = ctx.absolute(path);

        if path.is_file() {
            let directory = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| ctx.cwd.clone());
            debug!(file = %path.display(), "Using explicit version file");
            return Ok(PackageRoot {
                project_name: dir_name(&directory),
                version_file: Some(path),
                search_base: directory.clone(),
                directory,
            });
        }

        if !path.is_dir() {
            return Err(GrowError::PathNotFound(path));
        }

        return search(&path);
    }

    if let Some(name) = package_name {
        let location = ctx
            .registry
            .editable_location(name)?
            .ok_or_else(|| GrowError::NotAnEditablePackage(name.to_string()))?;
        let location = ctx.absolute(&location);
        debug!(package = name, location = %location.display(), "Found editable package");

        if !location.is_dir() {
            return Err(GrowError::PathNotFound(location));
        }

        return search(&location);
    }

    let root = ctx.project_root()?;
    search(&root)
}

/// Search `base` for the package directory.
///
/// Priority: `src/<project>`, `<project>`, then any other directory directly
/// under `base` or `base/src` holding a version file (by directory name),
/// then `base` itself if it directly holds one.
fn search(base: &Path) -> Result<PackageRoot, GrowError> {
    let name = project_name(base)?;
    let preferred = [base.join(SRC_DIR).join(&name), base.join(&name)];

    let mut found = preferred
        .iter()
        .find(|dir| dir.is_dir() && locator::has_candidates(dir))
        .cloned();
    if found.is_none() {
        found = other_package_dirs(base, &preferred)?
            .into_iter()
            .find(|dir| locator::has_candidates(dir));
    }
    if found.is_none() && holds_version_file(base) {
        found = Some(base.to_path_buf());
    }

    match found {
        Some(directory) => {
            debug!(
                project = %name,
                dir = %directory.display(),
                "Resolved package directory"
            );
            Ok(PackageRoot {
                directory,
                project_name: name,
                version_file: None,
                search_base: base.to_path_buf(),
            })
        }
        None => Err(GrowError::NoVersionFilesFound {
            candidates: locator::scan_project(base),
        }),
    }
}

/// Directories under `base` and `base/src` other than `exclude`, ordered by
/// directory name.
fn other_package_dirs(base: &Path, exclude: &[PathBuf]) -> Result<Vec<PathBuf>, GrowError> {
    let mut dirs = child_dirs(base)?;
    let src = base.join(SRC_DIR);
    if src.is_dir() {
        dirs.retain(|dir| dir != &src);
        dirs.extend(child_dirs(&src)?);
    }

    dirs.retain(|dir| !exclude.contains(dir) && !locator::is_ignored_dir(dir));
    dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
    Ok(dirs)
}

fn child_dirs(dir: &Path) -> Result<Vec<PathBuf>, GrowError> {
    let entries = std::fs::read_dir(dir).map_err(|e| GrowError::io("read directory", dir, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| GrowError::io("read directory", dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}

fn holds_version_file(dir: &Path) -> bool {
    FileRank::ALL
        .iter()
        .any(|rank| dir.join(rank.file_name()).is_file())
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
