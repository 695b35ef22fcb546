//! Version file discovery inside a package directory.
//!
//! Three file names can carry a package's `__version__`. They are ranked:
//!
//! 1. `__version__.py` anywhere under the package directory
//! 2. `__about__.py` anywhere under the package directory
//! 3. the package's own top-level `__init__.py`

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory names never searched for version files.
const SKIPPED_DIRS: &[&str] = &[
    "__pycache__",
    "build",
    "dist",
    "node_modules",
    "venv",
    "env",
    "site-packages",
];

/// Kind of version-declaring file, most authoritative first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileRank {
    VersionModule,
    AboutModule,
    InitModule,
}

impl FileRank {
    pub const ALL: [FileRank; 3] = [
        FileRank::VersionModule,
        FileRank::AboutModule,
        FileRank::InitModule,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            FileRank::VersionModule => "__version__.py",
            FileRank::AboutModule => "__about__.py",
            FileRank::InitModule => "__init__.py",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rank| rank.file_name() == name)
    }

    /// Whether a file of this kind counts when found `depth` levels below
    /// the package directory (1 = directly inside it).
    fn accepts_depth(self, depth: usize) -> bool {
        match self {
            FileRank::VersionModule | FileRank::AboutModule => true,
            FileRank::InitModule => depth == 1,
        }
    }
}

impl fmt::Display for FileRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A file that may declare the package version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFileCandidate {
    pub path: PathBuf,
    pub rank: FileRank,
    depth: usize,
}

impl VersionFileCandidate {
    /// Candidate for a file named explicitly by the caller.
    pub fn explicit(path: PathBuf) -> Self {
        let rank = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(FileRank::from_file_name)
            .unwrap_or(FileRank::InitModule);
        Self {
            path,
            rank,
            depth: 1,
        }
    }

    fn sort_key(&self) -> (FileRank, usize, &Path) {
        (self.rank, self.depth, &self.path)
    }
}

/// Rank the version files under `package_dir`, most authoritative first.
///
/// Within one rank, shallower files win, then lexical path order.
pub fn locate(package_dir: &Path) -> Vec<VersionFileCandidate> {
    let mut candidates: Vec<VersionFileCandidate> = walk(package_dir)
        .filter_map(|entry| {
            let rank = entry.file_name().to_str().and_then(FileRank::from_file_name)?;
            let depth = entry.depth();
            rank.accepts_depth(depth).then(|| VersionFileCandidate {
                path: entry.into_path(),
                rank,
                depth,
            })
        })
        .collect();

    candidates.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    debug!(
        dir = %package_dir.display(),
        found = candidates.len(),
        "Located version file candidates"
    );
    candidates
}

/// Whether `dir` holds at least one version file candidate.
pub fn has_candidates(dir: &Path) -> bool {
    !locate(dir).is_empty()
}

/// List every file under `root` carrying one of the version file names.
///
/// Used for diagnostics only when no package directory could be chosen;
/// nothing in the list is treated as authoritative.
pub fn scan_project(root: &Path) -> Vec<PathBuf> {
    walk(root)
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(FileRank::from_file_name)
                .is_some()
        })
        .map(DirEntry::into_path)
        .collect()
}

fn walk(root: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable path during version file scan");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && is_ignored_dir(entry.path())
}

/// Whether a directory is hidden, a build/cache artifact or a virtualenv.
pub(crate) fn is_ignored_dir(dir: &Path) -> bool {
    let name = match dir.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return false,
    };
    name.starts_with('.')
        || name.ends_with(".egg-info")
        || SKIPPED_DIRS.contains(&&*name)
        || dir.join("pyvenv.cfg").is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "__version__ = '0.0.1'\n").unwrap();
        path
    }

    #[test]
    fn test_rank_order() {
        let dir = tempfile::tempdir().unwrap();
        let init = touch(dir.path(), "__init__.py");
        let about = touch(dir.path(), "__about__.py");
        let version = touch(dir.path(), "__version__.py");

        let found: Vec<PathBuf> = locate(dir.path()).into_iter().map(|c| c.path).collect();
        assert_eq!(found, vec![version, about, init]);
    }

    #[test]
    fn test_nested_version_module_beats_top_level_init() {
        let dir = tempfile::tempdir().unwrap();
        let init = touch(dir.path(), "__init__.py");
        let nested = touch(dir.path(), "_meta/__version__.py");

        let found = locate(dir.path());
        assert_eq!(found[0].path, nested);
        assert_eq!(found[0].rank, FileRank::VersionModule);
        assert_eq!(found[1].path, init);
    }

    #[test]
    fn test_nested_init_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "sub/__init__.py");

        assert!(locate(dir.path()).is_empty());
        assert!(!has_candidates(dir.path()));
    }

    #[test]
    fn test_shallower_candidate_wins_within_rank() {
        let dir = tempfile::tempdir().unwrap();
        let deep = touch(dir.path(), "a/b/__about__.py");
        let shallow = touch(dir.path(), "z/__about__.py");

        let found: Vec<PathBuf> = locate(dir.path()).into_iter().map(|c| c.path).collect();
        assert_eq!(found, vec![shallow, deep]);
    }

    #[test]
    fn test_skips_caches_and_virtualenvs() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "__pycache__/__version__.py");
        touch(dir.path(), ".hidden/__version__.py");
        touch(dir.path(), "pkg.egg-info/__about__.py");
        touch(dir.path(), "myenv/pyvenv.cfg");
        touch(dir.path(), "myenv/lib/__version__.py");

        assert!(locate(dir.path()).is_empty());
    }

    #[test]
    fn test_scan_project_lists_all_names() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "docs/__about__.py");
        let b = touch(dir.path(), "tests/__init__.py");
        let c = touch(dir.path(), "tests/unit/__init__.py");
        touch(dir.path(), "tests/conftest.py");

        let found = scan_project(dir.path());
        assert_eq!(found, vec![a, b, c]);
    }

    #[test]
    fn test_explicit_candidate_rank() {
        let candidate = VersionFileCandidate::explicit(PathBuf::from("/x/__about__.py"));
        assert_eq!(candidate.rank, FileRank::AboutModule);
        let other = VersionFileCandidate::explicit(PathBuf::from("/x/version.py"));
        assert_eq!(other.rank, FileRank::InitModule);
    }
}
