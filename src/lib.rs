//! incubate - project lifecycle tooling for Python packages.
//!
//! # Overview
//!
//! The `grow` pipeline finds the file that declares a package's
//! `__version__`, computes the next semantic version and rewrites the
//! literal in place without touching anything else in the file.

pub mod error;
pub mod grow;
pub mod project;
pub mod registry;
pub mod settings;
pub mod version;

// Re-export commonly used types
pub use error::{GrowError, ProjectError, RegistryError, SettingsError, VersionError};
pub use grow::{BumpReport, GrowRequest, bump_project};
pub use project::ProjectContext;
pub use registry::{PackageRegistry, PipRegistry};
pub use settings::Settings;
pub use version::{BumpPolicy, BumpSpecifier, SemanticVersion};
