//! Log setup for the editor.
//!
//! The terminal is in raw mode while the editor runs, so log records can
//! never go to stderr. When `IEDIT_LOG` names a file, `env_logger` appends
//! to it at the level given by `RUST_LOG` (default `info`); otherwise no
//! logger is installed and the `log` macros are no-ops.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::path::PathBuf;

/// Environment variable naming the log file.
pub const LOG_FILE_ENV: &str = "IEDIT_LOG";

/// The log file requested by `value`, ignoring empty values.
#[must_use]
pub fn log_file_path(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|path| !path.is_empty()).map(PathBuf::from)
}

/// Install the file logger when `IEDIT_LOG` is set.
///
/// Failure to open the file leaves logging disabled.
pub fn init() {
    let Some(path) = log_file_path(std::env::var_os(LOG_FILE_ENV)) else {
        return;
    };
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(_) => return,
    };

    let env = env_logger::Env::default().default_filter_or("info");
    let installed = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
    if installed.is_ok() {
        log::info!("iedit {} logging to {}", env!("CARGO_PKG_VERSION"), path.display());
    }
}
