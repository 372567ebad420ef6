//! Building iedit from a source tarball.
//!
//! Release source archives unpack to a single top-level directory holding
//! the workspace; `cargo install --locked` builds it into a staging root
//! whose `bin/iedit` is then installed like any prebuilt binary.

use crate::artefact::naming::BINARY_NAME;
use crate::error::{InstallerError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs `program` with `args` and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use iedit_installer::builder::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("cargo", &["--version".to_owned()])?;
    /// assert!(output.status.success());
    /// # Ok::<(), iedit_installer::error::InstallerError>(())
    /// ```
    fn run(&self, program: &str, args: &[String]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, program: &str, args: &[String]) -> Result<Output> {
        Command::new(program)
            .args(args)
            .output()
            .map_err(InstallerError::from)
    }
}

/// Find the crate root of an unpacked source tree: `dir` itself when it
/// holds a `Cargo.toml`, otherwise its single child directory that does.
///
/// # Errors
///
/// Returns [`InstallerError::BuildFailed`] when no such directory exists.
pub fn source_root(dir: &Path) -> Result<PathBuf> {
    if dir.join("Cargo.toml").is_file() {
        return Ok(dir.to_path_buf());
    }

    let mut roots = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.join("Cargo.toml").is_file() {
            roots.push(path);
        }
    }

    match roots.len() {
        1 => Ok(roots.remove(0)),
        0 => Err(InstallerError::BuildFailed {
            reason: format!("no Cargo.toml found in {}", dir.display()),
        }),
        count => Err(InstallerError::BuildFailed {
            reason: format!("{count} candidate source roots in {}", dir.display()),
        }),
    }
}

/// Arguments of the `cargo install` invocation.
#[must_use]
pub fn cargo_install_args(source: &Path, staging_root: &Path) -> Vec<String> {
    vec![
        "install".to_owned(),
        "--locked".to_owned(),
        "--path".to_owned(),
        source.display().to_string(),
        "--root".to_owned(),
        staging_root.display().to_string(),
    ]
}

/// Build the unpacked source tree at `source_dir` into `staging_root` and
/// return the path of the built executable.
///
/// # Errors
///
/// Returns [`InstallerError::BuildFailed`] when no crate root is found,
/// cargo exits unsuccessfully or no executable was produced.
pub fn build_from_source(
    executor: &dyn CommandExecutor,
    source_dir: &Path,
    staging_root: &Path,
) -> Result<PathBuf> {
    let root = source_root(source_dir)?;
    log::info!("building {} from {}", BINARY_NAME, root.display());

    let output = executor.run("cargo", &cargo_install_args(&root, staging_root))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(InstallerError::BuildFailed {
            reason: format!("cargo install exited with {}: {}", output.status, stderr.trim()),
        });
    }

    let binary = staging_root.join("bin").join(BINARY_NAME);
    if !binary.is_file() {
        return Err(InstallerError::BuildFailed {
            reason: format!("cargo install did not produce {}", binary.display()),
        });
    }
    Ok(binary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::cargo_output;
    use mockall::predicate::eq;

    fn unpacked_source() -> (tempfile::TempDir, PathBuf) {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = temp.path().join("iedit-0.1.0");
        std::fs::create_dir_all(&root).expect("mkdir");
        std::fs::write(root.join("Cargo.toml"), "[workspace]\n").expect("write");
        (temp, root)
    }

    #[test]
    fn source_root_descends_into_single_directory() {
        let (temp, root) = unpacked_source();
        assert_eq!(source_root(temp.path()).expect("root"), root);
    }

    #[test]
    fn source_root_requires_a_manifest() {
        let temp = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(temp.path().join("docs")).expect("mkdir");
        assert!(matches!(
            source_root(temp.path()),
            Err(InstallerError::BuildFailed { .. })
        ));
    }

    #[test]
    fn builds_with_locked_cargo_install() {
        let (temp, root) = unpacked_source();
        let staging = temp.path().join("staging");
        let expected_args = cargo_install_args(&root, &staging);
        let built = staging.join("bin").join("iedit");

        let mut executor = MockCommandExecutor::new();
        let built_for_mock = built.clone();
        executor
            .expect_run()
            .with(eq("cargo"), eq(expected_args))
            .times(1)
            .returning(move |_, _| {
                std::fs::create_dir_all(built_for_mock.parent().expect("parent"))?;
                std::fs::write(&built_for_mock, b"bin")?;
                Ok(cargo_output(0, ""))
            });

        let binary = build_from_source(&executor, temp.path(), &staging).expect("build");
        assert_eq!(binary, built);
    }

    #[test]
    fn failed_build_reports_stderr() {
        let (temp, _root) = unpacked_source();
        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .returning(|_, _| Ok(cargo_output(101, "error[E0425]: cannot find value")));

        let err = build_from_source(&executor, temp.path(), &temp.path().join("staging"))
            .expect_err("build fails");
        assert!(err.to_string().contains("E0425"), "got {err}");
    }

    #[test]
    fn successful_build_without_binary_fails() {
        let (temp, _root) = unpacked_source();
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().returning(|_, _| Ok(cargo_output(0, "")));

        let err = build_from_source(&executor, temp.path(), &temp.path().join("staging"))
            .expect_err("no binary");
        assert!(matches!(err, InstallerError::BuildFailed { .. }));
    }
}
