//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use incubate::error::RegistryError;
use incubate::{BumpReport, GrowError, GrowRequest, PackageRegistry, ProjectContext, bump_project};

/// Registry answering from a fixed table of editable packages.
#[derive(Debug, Default)]
pub struct FakeRegistry {
    editable: HashMap<String, PathBuf>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_editable(mut self, name: &str, location: impl Into<PathBuf>) -> Self {
        self.editable.insert(name.to_string(), location.into());
        self
    }
}

impl PackageRegistry for FakeRegistry {
    fn editable_location(&self, name: &str) -> Result<Option<PathBuf>, RegistryError> {
        Ok(self.editable.get(name).cloned())
    }
}

/// A Python project laid out in a temp directory.
pub struct TestProject {
    pub dir: tempfile::TempDir,
}

impl TestProject {
    /// Create a project whose `pyproject.toml` declares `name`.
    pub fn new(name: &str) -> Self {
        let project = Self::empty();
        project.write(
            "pyproject.toml",
            &format!("[metadata]\nname = \"{}\"\nversion = \"0.0.1\"\n", name),
        );
        project
    }

    /// Create a directory with no manifest at all.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        let parent = path.parent().expect("Fixture path has no parent");
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        std::fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", rel, e))
    }

    /// Run `grow` from the project root with no editable packages installed.
    pub fn grow(&self, request: &GrowRequest<'_>) -> Result<BumpReport, GrowError> {
        self.grow_from(self.root(), &FakeRegistry::new(), request)
    }

    /// Run `grow` from `cwd` against `registry`.
    pub fn grow_from(
        &self,
        cwd: &Path,
        registry: &FakeRegistry,
        request: &GrowRequest<'_>,
    ) -> Result<BumpReport, GrowError> {
        let ctx = ProjectContext::new(cwd, registry);
        bump_project(&ctx, request)
    }
}
