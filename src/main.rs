use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use git_release::cli::orchestration::{run_release, ReleaseRequest};
use git_release::config;
use git_release::git::{self, GitCli, SystemRunner};
use git_release::manifest::JsonManifest;
use git_release::{ui, GitReleaseError};

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    version,
    about = "Bump the manifest version, commit all changes and push"
)]
struct Args {
    #[arg(short, long, help = "Commit message (required unless given as positional words)")]
    message: Option<String>,

    #[arg(long, help = "Bump patch version (e.g., 0.1.124 -> 0.1.125)")]
    patch: bool,

    #[arg(long, help = "Bump minor version (e.g., 0.1.124 -> 0.2.0)")]
    minor: bool,

    #[arg(long, help = "Bump major version (e.g., 0.1.124 -> 1.0.0)")]
    major: bool,

    #[arg(
        short,
        long,
        help = "Target branch name. If omitted, commits to current branch."
    )]
    branch: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Manifest holding the version, relative to the repository root")]
    manifest: Option<PathBuf>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Print every git command before running it")]
    verbose: bool,

    #[arg(
        value_name = "WORDS",
        help = "Commit message as plain words (legacy form, implies --patch)"
    )]
    words: Vec<String>,
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        ui::display_error(&format!("{:#}", err));
        let code = err
            .downcast_ref::<GitReleaseError>()
            .map_or(1, GitReleaseError::exit_code);
        process::exit(code);
    }
}

fn run(args: Args) -> Result<()> {
    // Argument problems are reported before anything is read or run.
    let request = ReleaseRequest::from_cli(
        args.message,
        args.words,
        args.patch,
        args.minor,
        args.major,
        args.branch,
    )?;

    let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
    let workdir =
        git::discover_workdir(&cwd).context("git-release must be run inside a git work tree")?;

    let mut config = config::load_config(args.config.as_deref(), &workdir)?;
    if let Some(manifest) = args.manifest {
        config.manifest = manifest;
    }

    let verbose = args.verbose || config.behavior.verbose;
    let git = GitCli::new(SystemRunner::new(&workdir).with_echo(verbose));
    let mut manifest =
        JsonManifest::new(config.manifest_path(&workdir)).with_field(&config.version_field);

    let request = request
        .with_remote(config.push.remote.clone())
        .dry_run(args.dry_run);

    if request.dry_run {
        ui::display_status("Dry run: nothing will be changed");
    }

    let outcome = run_release(&request, &git, &mut manifest, |event| {
        ui::display_event(&event)
    })?;

    ui::display_summary(&outcome.summary(), outcome.dry_run);
    Ok(())
}
