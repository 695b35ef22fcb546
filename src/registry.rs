//! Editable-package lookup.
//!
//! An editable install points the environment at a source checkout instead of
//! a copy, so its recorded location is where `grow` must look for version
//! files when given a package name.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;
use tracing::debug;

use crate::error::RegistryError;
use crate::project::normalize_package_name;

/// Maps installed editable package names to their source directories.
#[cfg_attr(test, mockall::automock)]
pub trait PackageRegistry {
    /// Source directory of the editable package `name`, if one is installed.
    fn editable_location(&self, name: &str) -> Result<Option<PathBuf>, RegistryError>;
}

/// Registry backed by `python -m pip list --editable`.
#[derive(Debug, Clone, Default)]
pub struct PipRegistry {
    virtual_env: Option<PathBuf>,
}

impl PipRegistry {
    /// Query the interpreter of `virtual_env` when given, else the first
    /// `python3`/`python` on `PATH`.
    pub fn new(virtual_env: Option<PathBuf>) -> Self {
        Self { virtual_env }
    }

    fn interpreter(&self) -> Result<PathBuf, RegistryError> {
        if let Some(venv) = &self.virtual_env {
            if let Some(python) = venv_interpreter(venv) {
                return Ok(python);
            }
            debug!(venv = %venv.display(), "No interpreter inside virtual environment");
        }

        which::which("python3")
            .or_else(|_| which::which("python"))
            .map_err(|_| RegistryError::PythonNotFound)
    }
}

impl PackageRegistry for PipRegistry {
    fn editable_location(&self, name: &str) -> Result<Option<PathBuf>, RegistryError> {
        let python = self.interpreter()?;
        debug!(python = %python.display(), package = name, "Listing editable packages");

        let output = Command::new(&python)
            .args([
                "-m",
                "pip",
                "list",
                "--editable",
                "--format=json",
                "--disable-pip-version-check",
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(RegistryError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let code = output.status.code().unwrap_or(-1);
            return Err(RegistryError::NonZeroExit { code, stderr });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        find_in_pip_list(&stdout, name)
    }
}

fn venv_interpreter(venv: &Path) -> Option<PathBuf> {
    ["bin/python", "bin/python3", "Scripts/python.exe"]
        .iter()
        .map(|rel| venv.join(rel))
        .find(|path| path.is_file())
}

/// One row of `pip list --format=json`.
#[derive(Debug, Deserialize)]
struct PipPackage {
    name: String,
    /// pip >= 21.3
    #[serde(default)]
    editable_project_location: Option<String>,
    /// Older pip reports the checkout here for editable rows.
    #[serde(default)]
    location: Option<String>,
}

fn find_in_pip_list(json: &str, name: &str) -> Result<Option<PathBuf>, RegistryError> {
    let packages: Vec<PipPackage> =
        serde_json::from_str(json.trim()).map_err(|e| RegistryError::InvalidJson(e.to_string()))?;

    let wanted = normalize_package_name(name);
    let location = packages
        .into_iter()
        .find(|p| normalize_package_name(&p.name) == wanted)
        .and_then(|p| p.editable_project_location.or(p.location))
        .map(PathBuf::from);

    Ok(location)
}
