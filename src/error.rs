//! Error types for incubate modules using thiserror.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from parsing or bumping a semantic version.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, #[source] semver::Error),

    #[error("Version '{version}' has unsupported {component} '{value}' (expected <label>.<number>)")]
    UnsupportedSuffix {
        version: String,
        component: &'static str,
        value: String,
    },

    #[error("Version component {0} overflowed while bumping")]
    Overflow(&'static str),

    #[error("Invalid label '{0}': use ASCII letters, digits and hyphens, with at least one non-digit")]
    InvalidLabel(String),
}

/// Errors from project-root discovery and manifest reading.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error(
        "No project found: neither pyproject.toml nor setup.py exists in {} or any parent directory",
        .0.display()
    )]
    NotFound(PathBuf),

    #[error("Failed to read manifest {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {}: {reason}", .path.display())]
    ManifestParse { path: PathBuf, reason: String },
}

/// Errors from querying the editable-package registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("No Python interpreter found. Activate a virtual environment or install python3.")]
    PythonNotFound,

    #[error("Failed to spawn pip: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("pip exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("pip returned invalid JSON: {0}")]
    InvalidJson(String),
}

/// Errors from loading the settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings {}: {source}", .path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a version assignment could not be extracted from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierProblem {
    /// No single-line `__version__ = "..."` assignment exists.
    Missing,
    /// More than one assignment exists, so none is authoritative.
    Ambiguous { count: usize },
}

impl fmt::Display for SpecifierProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecifierProblem::Missing => write!(f, "no version assignment"),
            SpecifierProblem::Ambiguous { count } => {
                write!(f, "{} version assignments", count)
            }
        }
    }
}

/// Errors from the `grow` pipeline.
#[derive(Error, Debug)]
pub enum GrowError {
    #[error("Invalid bump specifier '{0}'. Expected one of: major, minor, patch, fix, pre, build")]
    InvalidBumpSpecifier(String),

    #[error("Directory `{}` does not exist.", .0.display())]
    PathNotFound(PathBuf),

    #[error("`{0}` is not an editable package.")]
    NotAnEditablePackage(String),

    #[error("{}", describe_missing_files(.candidates))]
    NoVersionFilesFound { candidates: Vec<PathBuf> },

    #[error("Unable to find a version specifier. ({problem} in {})", .path.display())]
    VersionSpecifierNotFound {
        path: PathBuf,
        problem: SpecifierProblem,
    },

    #[error("Invalid version format in {}: {source}", .path.display())]
    InvalidVersionFormat {
        path: PathBuf,
        #[source]
        source: VersionError,
    },

    #[error("Rewriting {} did not yield version {expected}", .path.display())]
    RewriteMismatch { path: PathBuf, expected: String },

    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to update manifest {}: {reason}", .path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl GrowError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GrowError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

fn describe_missing_files(candidates: &[PathBuf]) -> String {
    if candidates.is_empty() {
        return "No version files found.".to_string();
    }

    let mut message = String::from(
        "No version files found in the package directory.\nFound version files:",
    );
    for candidate in candidates {
        message.push_str(&format!("\n  {}", candidate.display()));
    }
    message.push_str("\n\nUnable to find a version specifier.");
    message
}
