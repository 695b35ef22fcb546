//! Successor calculation for a bump specifier and label policy.

use std::fmt;
use std::str::FromStr;

use crate::error::{GrowError, VersionError};

use super::semantic::{SemanticVersion, Suffix};

/// Label used for a new pre-release when neither the caller nor the settings name one.
pub const DEFAULT_PRE_LABEL: &str = "rc";

/// Label used for new build metadata when neither the caller nor the settings name one.
pub const DEFAULT_BUILD_LABEL: &str = "build";

/// Which part of the version to advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpSpecifier {
    Major,
    Minor,
    Patch,
    Pre,
    Build,
}

impl FromStr for BumpSpecifier {
    type Err = GrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" | "fix" => Ok(Self::Patch),
            "pre" => Ok(Self::Pre),
            "build" => Ok(Self::Build),
            other => Err(GrowError::InvalidBumpSpecifier(other.to_string())),
        }
    }
}

impl fmt::Display for BumpSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Pre => "pre",
            Self::Build => "build",
        };
        f.write_str(name)
    }
}

/// Label selection for one suffix kind.
///
/// `override_label` comes from the current invocation, `default_label` from
/// the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPolicy {
    pub override_label: Option<String>,
    pub default_label: Option<String>,
}

impl LabelPolicy {
    pub fn new(override_label: Option<String>, default_label: Option<String>) -> Self {
        Self {
            override_label,
            default_label,
        }
    }

    fn initial_label<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.override_label
            .as_deref()
            .or(self.default_label.as_deref())
            .unwrap_or(fallback)
    }

    fn advance(&self, current: Option<&Suffix>, fallback: &str) -> Result<Suffix, VersionError> {
        match current {
            None => {
                let label = self.initial_label(fallback);
                validate_label(label)?;
                Ok(Suffix::new(label, 1))
            }
            Some(existing) => match self.override_label.as_deref() {
                Some(label) if label != existing.label => {
                    validate_label(label)?;
                    Ok(Suffix::new(label, 1))
                }
                _ => Ok(Suffix::new(
                    existing.label.clone(),
                    increment(existing.number, "number")?,
                )),
            },
        }
    }
}

/// Pre-release and build label policy for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BumpPolicy {
    pub pre: LabelPolicy,
    pub build: LabelPolicy,
}

/// Compute the successor of `version`.
///
/// - major: increment major, reset minor and patch, clear pre and build
/// - minor: increment minor, reset patch, clear pre and build
/// - patch: increment patch, clear pre and build
/// - pre: start `<label>.1` or advance the existing pre-release
/// - build: same as pre, applied to build metadata only
pub fn apply_bump(
    version: &SemanticVersion,
    spec: BumpSpecifier,
    policy: &BumpPolicy,
) -> Result<SemanticVersion, VersionError> {
    let next = match spec {
        BumpSpecifier::Major => SemanticVersion::new(increment(version.major, "major")?, 0, 0),
        BumpSpecifier::Minor => {
            SemanticVersion::new(version.major, increment(version.minor, "minor")?, 0)
        }
        BumpSpecifier::Patch => SemanticVersion::new(
            version.major,
            version.minor,
            increment(version.patch, "patch")?,
        ),
        BumpSpecifier::Pre => SemanticVersion {
            pre: Some(policy.pre.advance(version.pre.as_ref(), DEFAULT_PRE_LABEL)?),
            ..version.clone()
        },
        BumpSpecifier::Build => SemanticVersion {
            build: Some(policy.build.advance(version.build.as_ref(), DEFAULT_BUILD_LABEL)?),
            ..version.clone()
        },
    };

    Ok(next)
}

/// A label must be one non-numeric semver identifier so `<label>.<n>` parses back.
fn validate_label(label: &str) -> Result<(), VersionError> {
    let valid = !label.is_empty()
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !label.chars().all(|c| c.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(VersionError::InvalidLabel(label.to_string()))
    }
}

fn increment(value: u64, component: &'static str) -> Result<u64, VersionError> {
    value.checked_add(1).ok_or(VersionError::Overflow(component))
}
