//! incubate - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use incubate::settings::default_settings_path;
use incubate::{
    BumpPolicy, BumpSpecifier, GrowError, GrowRequest, PipRegistry, ProjectContext, Settings,
    bump_project,
};

/// Environment variables naming an active Python environment, checked in order.
const ENV_PREFIX_VARS: [&str; 2] = ["VIRTUAL_ENV", "CONDA_PREFIX"];

/// Manage a Python project's lifecycle.
#[derive(Parser, Debug)]
#[command(name = "incubate")]
#[command(about = "Manage a Python project's lifecycle")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Increment the version declared in a package's source files
    Grow(GrowArgs),
}

#[derive(Args, Debug)]
struct GrowArgs {
    /// Part to increment: major, minor, patch (alias fix), pre or build
    #[arg(value_parser = parse_bump_specifier)]
    part: BumpSpecifier,

    /// Editable package in the active environment to bump
    package: Option<String>,

    /// Project directory or version file to bump
    #[arg(short, long, conflicts_with = "package")]
    path: Option<PathBuf>,

    /// Pre-release label, overriding the configured default
    #[arg(long, value_name = "LABEL")]
    pre: Option<String>,

    /// Build metadata label, overriding the configured default
    #[arg(long, value_name = "LABEL")]
    build: Option<String>,

    /// Print the new version without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Also update the version in pyproject.toml
    #[arg(long)]
    sync_manifest: bool,

    /// Settings file with default labels
    #[arg(long, env = "INCUBATE_SETTINGS", value_name = "FILE")]
    settings: Option<PathBuf>,
}

fn parse_bump_specifier(value: &str) -> Result<BumpSpecifier, GrowError> {
    value.parse()
}

fn main() -> ExitCode {
    // Usage errors, including an unknown bump part, exit with code 2 here.
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "incubate=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Grow(args) => grow(args),
    }
}

/// Merge the settings file named by `--settings`, `INCUBATE_SETTINGS` or the
/// platform default with the label flags of this invocation.
fn bump_policy(args: &GrowArgs) -> Result<BumpPolicy> {
    let settings = match args.settings.clone().or_else(default_settings_path) {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };

    Ok(settings.policy(args.pre.clone(), args.build.clone()))
}

fn grow(args: GrowArgs) -> Result<()> {
    let policy = bump_policy(&args)?;

    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let registry = PipRegistry::new(active_environment());
    let ctx = ProjectContext::new(cwd, &registry);

    let request = GrowRequest {
        spec: args.part,
        path: args.path.as_deref(),
        package: args.package.as_deref(),
        policy,
        dry_run: args.dry_run,
        sync_manifest: args.sync_manifest,
    };

    let report = bump_project(&ctx, &request)?;

    if report.written {
        println!("Updated {}", report.path.display());
    } else {
        println!("Would update {}", report.path.display());
    }
    if let Some(manifest) = &report.manifest {
        println!("Updated {}", manifest.display());
    }
    println!("{} -> {}", report.old_version, report.new_version);

    Ok(())
}

fn active_environment() -> Option<PathBuf> {
    ENV_PREFIX_VARS
        .iter()
        .find_map(|var| std::env::var_os(var).filter(|value| !value.is_empty()))
        .map(PathBuf::from)
}
