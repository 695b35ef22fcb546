//! User settings supplying default pre-release and build labels.
//!
//! Stored as JSON:
//!
//! ```json
//! { "semver": { "pre": "dev", "build": "nightly" } }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::SettingsError;
use crate::version::{BumpPolicy, LabelPolicy};

/// Directory under the platform config dir holding the settings file.
pub const APP_DIR: &str = "incubate";

/// Settings file name.
pub const SETTINGS_FILE: &str = "settings.json";

/// Label defaults for `grow pre` and `grow build`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SemverSettings {
    #[serde(default)]
    pub pre: Option<String>,
    #[serde(default)]
    pub build: Option<String>,
}

/// Persisted user settings. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub semver: SemverSettings,
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| SettingsError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merge the configured labels with per-call overrides.
    pub fn policy(&self, pre_override: Option<String>, build_override: Option<String>) -> BumpPolicy {
        BumpPolicy {
            pre: LabelPolicy::new(non_empty(pre_override), non_empty(self.semver.pre.clone())),
            build: LabelPolicy::new(
                non_empty(build_override),
                non_empty(self.semver.build.clone()),
            ),
        }
    }
}

/// Default settings location: `<config dir>/incubate/settings.json`.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}

fn non_empty(label: Option<String>) -> Option<String> {
    label
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}
