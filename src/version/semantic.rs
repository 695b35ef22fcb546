//! Semantic version values with numbered pre-release and build suffixes.

use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::error::VersionError;

/// A `label.number` suffix such as `rc.1` or `nightly.3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffix {
    pub label: String,
    pub number: u64,
}

impl Suffix {
    pub fn new(label: impl Into<String>, number: u64) -> Self {
        Self {
            label: label.into(),
            number,
        }
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.label, self.number)
    }
}

/// A `MAJOR.MINOR.PATCH[-label.N][+label.N]` version.
///
/// The grammar is checked by the `semver` crate first; the pre-release and
/// build components are then narrowed to exactly one label followed by one
/// positive number, which is the only shape `grow` knows how to advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<Suffix>,
    pub build: Option<Suffix>,
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: None,
            build: None,
        }
    }

    pub fn with_pre(mut self, label: impl Into<String>, number: u64) -> Self {
        self.pre = Some(Suffix::new(label, number));
        self
    }

    pub fn with_build(mut self, label: impl Into<String>, number: u64) -> Self {
        self.build = Some(Suffix::new(label, number));
        self
    }

    /// Parse a version literal.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let parsed =
            Version::parse(text).map_err(|e| VersionError::ParseFailed(text.to_string(), e))?;

        let pre = match parsed.pre.as_str() {
            "" => None,
            raw => Some(parse_suffix(text, "pre-release", raw)?),
        };
        let build = match parsed.build.as_str() {
            "" => None,
            raw => Some(parse_suffix(text, "build metadata", raw)?),
        };

        Ok(Self {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre,
            build,
        })
    }
}

fn parse_suffix(version: &str, component: &'static str, raw: &str) -> Result<Suffix, VersionError> {
    let unsupported = || VersionError::UnsupportedSuffix {
        version: version.to_string(),
        component,
        value: raw.to_string(),
    };

    let (label, number) = raw.split_once('.').ok_or_else(unsupported)?;

    // A purely numeric label would make `1.0.0-1.2` look like a two-number suffix.
    if label.is_empty() || label.chars().all(|c| c.is_ascii_digit()) {
        return Err(unsupported());
    }

    let parsed: u64 = number.parse().map_err(|_| unsupported())?;
    // Rejects `0`, leading zeros and signs, which `parse` would otherwise accept.
    if parsed == 0 || parsed.to_string() != number {
        return Err(unsupported());
    }

    Ok(Suffix::new(label, parsed))
}

impl FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}
