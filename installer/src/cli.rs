//! CLI argument definitions for the iedit installer.
//!
//! Kept apart from the entrypoint so that the binary stays focused on
//! orchestration.

use crate::artefact::target::ArtefactTarget;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Install the iedit terminal editor.
#[derive(Parser, Debug)]
#[command(name = "iedit-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install the iedit terminal editor.\n\n",
    "The installer selects the release artefact for this machine, downloads it, ",
    "verifies its pinned SHA-256 digest and installs it as `iedit` in your bin ",
    "directory. Source tarballs are built with `cargo install --locked`. After ",
    "installing, `iedit --version` is run to check the binary works.",
))]
#[command(after_help = concat!(
    "TARGETS:\n",
    "  macos-x86_64    macOS on Intel\n",
    "  macos-arm64     macOS on Apple silicon\n",
    "  linux           Linux on any architecture\n\n",
    "EXAMPLES:\n",
    "  Install the embedded release:\n",
    "    $ iedit-installer\n\n",
    "  Install from a custom manifest into /usr/local/bin:\n",
    "    $ iedit-installer --manifest release.json --bin-dir /usr/local/bin\n\n",
    "  Preview what would be installed:\n",
    "    $ iedit-installer --dry-run\n\n",
    "  Check an existing install:\n",
    "    $ iedit-installer smoke-test --binary ~/.local/bin/iedit\n\n",
    "For more information, see: https://github.com/gooplancton/iedit",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Install arguments (used when no subcommand is given).
    #[command(flatten)]
    pub install: InstallArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install iedit (default when no subcommand given).
    Install(InstallArgs),

    /// Run the post-install check against an existing binary.
    SmokeTest(SmokeTestArgs),
}

/// Arguments for the install command.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallArgs {
    /// Release manifest to install from [default: embedded release].
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<Utf8PathBuf>,

    /// Directory to install into [default: platform bin directory].
    #[arg(short, long, value_name = "DIR")]
    pub bin_dir: Option<Utf8PathBuf>,

    /// Artefact target to install [default: this machine].
    #[arg(short, long, value_name = "TARGET")]
    pub target: Option<ArtefactTarget>,

    /// Show what would be installed and exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not run `iedit --version` after installing.
    #[arg(long)]
    pub skip_smoke_test: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Arguments for the smoke-test command.
#[derive(Parser, Debug, Clone, Default)]
pub struct SmokeTestArgs {
    /// Binary to check [default: `<bin dir>/iedit`].
    #[arg(long, value_name = "PATH")]
    pub binary: Option<Utf8PathBuf>,

    /// Version the binary must report [default: manifest version].
    #[arg(long = "expect-version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Release manifest providing the default version.
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<Utf8PathBuf>,
}

impl Cli {
    /// Returns the effective install arguments.
    ///
    /// If an `Install` subcommand was provided, returns those arguments.
    /// Otherwise returns the flattened install arguments.
    #[must_use]
    pub fn install_args(&self) -> &InstallArgs {
        match &self.command {
            Some(Command::Install(args)) => args,
            Some(Command::SmokeTest(_)) | None => &self.install,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn bare_invocation_installs_with_defaults() {
        let cli = Cli::parse_from(["iedit-installer"]);
        assert!(cli.command.is_none());
        let args = cli.install_args();
        assert!(args.manifest.is_none());
        assert!(args.target.is_none());
        assert!(!args.dry_run);
    }

    #[rstest]
    #[case::flattened(&["iedit-installer", "--target", "macos-arm64", "--dry-run"])]
    #[case::subcommand(&["iedit-installer", "install", "--target", "macos-arm64", "--dry-run"])]
    fn install_flags_parse_in_both_positions(#[case] argv: &[&str]) {
        let cli = Cli::parse_from(argv);
        let args = cli.install_args();
        assert_eq!(args.target, Some(ArtefactTarget::MacOsArm64));
        assert!(args.dry_run);
    }

    #[test]
    fn unknown_target_is_rejected() {
        let result = Cli::try_parse_from(["iedit-installer", "--target", "windows"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbosity_counts_repeats() {
        let cli = Cli::parse_from(["iedit-installer", "-vvv"]);
        assert_eq!(cli.install_args().verbosity, 3);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["iedit-installer", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn smoke_test_takes_binary_and_version() {
        let cli = Cli::parse_from([
            "iedit-installer",
            "smoke-test",
            "--binary",
            "/opt/bin/iedit",
            "--expect-version",
            "0.1.0",
        ]);
        let Some(Command::SmokeTest(args)) = cli.command else {
            panic!("expected smoke-test subcommand");
        };
        assert_eq!(args.binary.as_deref().map(|p| p.as_str()), Some("/opt/bin/iedit"));
        assert_eq!(args.version.as_deref(), Some("0.1.0"));
    }
}
