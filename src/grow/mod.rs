//! Grow pipeline: bump the version declared in a package's source files.
//!
//! Resolves the package directory, picks the authoritative version file,
//! computes the successor version and rewrites the literal in place.

pub mod locator;
pub mod manifest;
pub mod pattern;
pub mod resolver;
pub mod writer;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::GrowError;
use crate::project::{ProjectContext, find_project_root};
use crate::version::{BumpPolicy, BumpSpecifier, SemanticVersion, apply_bump};

use self::locator::VersionFileCandidate;
use self::manifest::{ManifestUpdate, plan_manifest_update};
use self::resolver::resolve;
use self::writer::write_atomic;

pub use self::resolver::PackageRoot;

/// Pipeline stages, in order. Any stage may end the run with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolvingRoot,
    LocatingFile,
    ParsingVersion,
    ComputingBump,
    Writing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolvingRoot => "resolving root",
            Stage::LocatingFile => "locating file",
            Stage::ParsingVersion => "parsing version",
            Stage::ComputingBump => "computing bump",
            Stage::Writing => "writing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Options for one `grow` run, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct GrowRequest<'a> {
    pub spec: BumpSpecifier,
    pub path: Option<&'a Path>,
    pub package: Option<&'a str>,
    pub policy: BumpPolicy,
    /// Compute the new version without touching any file.
    pub dry_run: bool,
    /// Also write the new version into `pyproject.toml`.
    pub sync_manifest: bool,
}

impl<'a> GrowRequest<'a> {
    pub fn new(spec: BumpSpecifier) -> Self {
        Self {
            spec,
            path: None,
            package: None,
            policy: BumpPolicy::default(),
            dry_run: false,
            sync_manifest: false,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpReport {
    pub old_version: SemanticVersion,
    pub new_version: SemanticVersion,
    pub path: PathBuf,
    /// Manifest updated alongside the version file, if any.
    pub manifest: Option<PathBuf>,
    /// False for dry runs.
    pub written: bool,
}

/// Run the grow pipeline for one project.
///
/// Nothing is written unless every earlier stage succeeded; the version file
/// is replaced atomically and only the version literal changes.
pub fn bump_project(
    ctx: &ProjectContext<'_>,
    request: &GrowRequest<'_>,
) -> Result<BumpReport, GrowError> {
    enter(Stage::ResolvingRoot);
    let root = resolve(ctx, request.path, request.package)?;

    enter(Stage::LocatingFile);
    let candidate = choose_version_file(&root)?;
    debug!(
        file = %candidate.path.display(),
        rank = %candidate.rank,
        "Selected version file"
    );

    enter(Stage::ParsingVersion);
    let source = std::fs::read_to_string(&candidate.path)
        .map_err(|e| GrowError::io("read", &candidate.path, e))?;
    let literal = pattern::locate(&source).map_err(|problem| GrowError::VersionSpecifierNotFound {
        path: candidate.path.clone(),
        problem,
    })?;
    let old_version =
        SemanticVersion::parse(literal.text).map_err(|source| GrowError::InvalidVersionFormat {
            path: candidate.path.clone(),
            source,
        })?;

    enter(Stage::ComputingBump);
    let new_version = apply_bump(&old_version, request.spec, &request.policy).map_err(|source| {
        GrowError::InvalidVersionFormat {
            path: candidate.path.clone(),
            source,
        }
    })?;
    let rendered = new_version.to_string();
    let updated = pattern::splice(&source, literal.span.clone(), &rendered);
    ensure_round_trip(&candidate.path, &updated, &rendered)?;
    debug!(old = %old_version, new = %new_version, spec = %request.spec, "Computed next version");

    // A broken manifest must fail the run before any file is written.
    let manifest_update = if request.sync_manifest {
        plan_manifest(&root, &new_version)?
    } else {
        None
    };

    if request.dry_run {
        enter(Stage::Done);
        return Ok(BumpReport {
            old_version,
            new_version,
            path: candidate.path,
            manifest: None,
            written: false,
        });
    }

    enter(Stage::Writing);
    write_atomic(&candidate.path, &updated)?;

    let manifest = match manifest_update {
        Some(update) => {
            update.write()?;
            Some(update.path)
        }
        None => None,
    };

    enter(Stage::Done);
    Ok(BumpReport {
        old_version,
        new_version,
        path: candidate.path,
        manifest,
        written: true,
    })
}

fn plan_manifest(
    root: &PackageRoot,
    version: &SemanticVersion,
) -> Result<Option<ManifestUpdate>, GrowError> {
    match find_project_root(&root.search_base) {
        Ok(project_root) => plan_manifest_update(&project_root, version),
        Err(e) => {
            debug!(error = %e, "No manifest to sync");
            Ok(None)
        }
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "grow stage");
}

fn choose_version_file(root: &PackageRoot) -> Result<VersionFileCandidate, GrowError> {
    if let Some(file) = &root.version_file {
        return Ok(VersionFileCandidate::explicit(file.clone()));
    }

    // The resolver only picks directories with candidates, but the tree may
    // have changed since.
    locator::locate(&root.directory)
        .into_iter()
        .next()
        .ok_or_else(|| GrowError::NoVersionFilesFound {
            candidates: locator::scan_project(&root.search_base),
        })
}

/// The rewritten text must yield exactly the new version when read back.
fn ensure_round_trip(path: &Path, updated: &str, expected: &str) -> Result<(), GrowError> {
    match pattern::locate(updated) {
        Ok(literal) if literal.text == expected => Ok(()),
        _ => Err(GrowError::RewriteMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
        }),
    }
}
