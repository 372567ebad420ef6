//! iedit installer CLI entrypoint.
//!
//! Selects the release artefact for this machine, verifies and installs it
//! as `iedit`, then checks that the installed binary reports its version.

use camino::Utf8Path;
use clap::Parser;
use iedit_installer::artefact::manifest::{ReleaseManifest, embedded_manifest, load_manifest};
use iedit_installer::artefact::naming::BINARY_NAME;
use iedit_installer::artefact::target::{ArtefactTarget, Platform};
use iedit_installer::cli::{Cli, Command, InstallArgs, SmokeTestArgs};
use iedit_installer::dirs::{BaseDirs, SystemBaseDirs, resolve_bin_dir};
use iedit_installer::error::{InstallerError, Result};
use iedit_installer::install_flow::{InstallConfig, install_release};
use iedit_installer::output::write_stderr_line;
use iedit_installer::smoke_test::run_smoke_test;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.install_args());

    let system_dirs = SystemBaseDirs::new();
    let dirs: Option<&dyn BaseDirs> = system_dirs.as_ref().map(|found| found as &dyn BaseDirs);

    let mut stderr = std::io::stderr();
    let run_result = run(&cli, dirs, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging(args: &InstallArgs) {
    let level = if args.quiet {
        log::LevelFilter::Error
    } else {
        match args.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli, dirs: Option<&dyn BaseDirs>, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Some(Command::SmokeTest(args)) => run_smoke(args, dirs, stderr),
        Some(Command::Install(_)) | None => run_install(cli.install_args(), dirs, stderr),
    }
}

fn run_install(args: &InstallArgs, dirs: Option<&dyn BaseDirs>, stderr: &mut dyn Write) -> Result<()> {
    let manifest = resolve_manifest(args.manifest.as_deref())?;
    let target = resolve_target(args.target)?;
    let bin_dir = resolve_bin_dir(args.bin_dir.as_deref(), dirs)?;

    let config = InstallConfig {
        manifest: &manifest,
        target,
        bin_dir: &bin_dir,
        dry_run: args.dry_run,
        skip_smoke_test: args.skip_smoke_test,
        quiet: args.quiet,
    };
    install_release(&config, stderr)?;
    Ok(())
}

fn run_smoke(args: &SmokeTestArgs, dirs: Option<&dyn BaseDirs>, stderr: &mut dyn Write) -> Result<()> {
    let version = match &args.version {
        Some(version) => version.clone(),
        None => resolve_manifest(args.manifest.as_deref())?
            .version
            .to_string(),
    };
    let binary = match &args.binary {
        Some(binary) => binary.clone().into_std_path_buf(),
        None => resolve_bin_dir(None, dirs)?.join(BINARY_NAME),
    };

    let output = run_smoke_test(&binary, &version)?;
    write_stderr_line(stderr, output.trim());
    Ok(())
}

fn resolve_manifest(manifest_path: Option<&Utf8Path>) -> Result<ReleaseManifest> {
    let manifest = match manifest_path {
        Some(path) => load_manifest(path.as_std_path())?,
        None => embedded_manifest()?,
    };
    Ok(manifest)
}

fn resolve_target(requested: Option<ArtefactTarget>) -> Result<ArtefactTarget> {
    match requested {
        Some(target) => Ok(target),
        None => Ok(ArtefactTarget::for_platform(Platform::current()?)),
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
