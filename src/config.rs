//! Editor configuration loaded from `~/.iedit.conf`.
//!
//! The file holds one `key = value` line per setting; `#` starts a comment.
//! Values may be written as TOML scalars (`"quoted"`, `true`, `8`) or bare
//! (`on`, `/home/me/syntax`). Lines are applied one at a time: an unknown key
//! or an unusable value is logged and skipped, and every other setting keeps
//! its default.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{EditorError, Result};

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "IEDIT_CONFIG";

/// File name of the configuration inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".iedit.conf";

/// User-tunable editor settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EditorConfig {
    /// Take over the whole terminal instead of opening inline.
    pub fullscreen: bool,
    /// Editing rows to reserve; 0 reserves half the terminal.
    pub min_lines: u16,
    /// Columns kept between the cursor and the left or right edge.
    pub horizontal_margin: u16,
    /// Rows kept between the cursor and the top or bottom edge.
    pub vertical_margin: u16,
    /// Width of a tab stop.
    pub tab_size: u16,
    /// Draw the line number gutter.
    pub show_line_numbers: bool,
    /// Show the keybinding hint popup on start.
    pub show_keybindings: bool,
    /// Warn once before quitting with unsaved changes.
    pub confirm_quit_unsaved_changes: bool,
    /// Insert spaces up to the next tab stop when Tab is pressed.
    pub tab_emit_spaces: bool,
    /// Colour the buffer using its syntax definition.
    pub enable_syntax_highlighting: bool,
    /// Yank into and paste from the system clipboard.
    pub use_system_clipboard: bool,
    /// Directory holding `<ext>.syntax.toml` user definitions.
    pub syntax_highlighting_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fullscreen: false,
            min_lines: 0,
            horizontal_margin: 4,
            vertical_margin: 4,
            tab_size: 4,
            show_line_numbers: true,
            show_keybindings: true,
            confirm_quit_unsaved_changes: true,
            tab_emit_spaces: true,
            enable_syntax_highlighting: true,
            use_system_clipboard: true,
            syntax_highlighting_dir: None,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration file's contents, skipping lines that cannot
    /// be applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use iedit::config::EditorConfig;
    ///
    /// let config = EditorConfig::parse("# mine\ntab_size = 2\nfullscreen = on\nretired_key = 1\n");
    /// assert_eq!(config.tab_size, 2);
    /// assert!(config.fullscreen);
    /// assert!(config.show_line_numbers);
    /// ```
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut config = Self::default();
        for (idx, raw_line) in source.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, raw_value)) = line.split_once('=') else {
                log::warn!("line {}: expected key = value, got {line:?}", idx + 1);
                continue;
            };
            match config.set(name, &setting_value(raw_value)) {
                Ok(()) => {}
                Err(EditorError::UnknownSetting { key }) => {
                    log::info!("line {}: ignoring unknown setting {key:?}", idx + 1);
                }
                Err(err) => log::warn!("line {}: {err}", idx + 1),
            }
        }
        config
    }

    /// Load the configuration at `path`.
    ///
    /// A missing file yields the defaults silently; an unreadable file is
    /// logged and also yields the defaults.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no configuration at {}", path.display());
                return Self::default();
            }
            Err(err) => {
                log::warn!("could not read {}: {err}", path.display());
                return Self::default();
            }
        };

        log::info!("loading configuration from {}", path.display());
        Self::parse(&source)
    }

    /// Load the configuration from [`config_path`], or the defaults when no
    /// location can be determined.
    #[must_use]
    pub fn load() -> Self {
        let home = directories_next::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        config_path(std::env::var_os(CONFIG_PATH_ENV), home)
            .map_or_else(Self::default, |path| Self::load_from(&path))
    }

    /// Change one setting for the rest of the session.
    ///
    /// Booleans accept `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off` in
    /// any case; numeric settings accept
    /// any `u16`. The highlighting directory is cleared by an empty value.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownSetting`] for keys that do not exist and
    /// [`EditorError::InvalidSetting`] for values that do not parse.
    pub fn set(&mut self, key: &str, raw_value: &str) -> Result<()> {
        let value = raw_value.trim();
        match key.trim() {
            "fullscreen" => self.fullscreen = parse_bool(key, value)?,
            "min_lines" => self.min_lines = parse_u16(key, value)?,
            "horizontal_margin" => self.horizontal_margin = parse_u16(key, value)?,
            "vertical_margin" => self.vertical_margin = parse_u16(key, value)?,
            "tab_size" => self.tab_size = parse_u16(key, value)?.max(1),
            "show_line_numbers" => self.show_line_numbers = parse_bool(key, value)?,
            "show_keybindings" => self.show_keybindings = parse_bool(key, value)?,
            "confirm_quit_unsaved_changes" => {
                self.confirm_quit_unsaved_changes = parse_bool(key, value)?;
            }
            "tab_emit_spaces" => self.tab_emit_spaces = parse_bool(key, value)?,
            "enable_syntax_highlighting" => {
                self.enable_syntax_highlighting = parse_bool(key, value)?;
            }
            "use_system_clipboard" => self.use_system_clipboard = parse_bool(key, value)?,
            "syntax_highlighting_dir" => {
                self.syntax_highlighting_dir =
                    (!value.is_empty()).then(|| PathBuf::from(value));
            }
            other => {
                return Err(EditorError::UnknownSetting {
                    key: other.to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Tab stop width as a column count, never zero.
    #[must_use]
    pub fn tab_width(&self) -> usize {
        usize::from(self.tab_size.max(1))
    }
}

/// Resolve where the configuration lives.
///
/// A non-empty `override_path` wins; otherwise the file sits in `home`.
#[must_use]
pub fn config_path(override_path: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    override_path
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|home| home.join(CONFIG_FILE_NAME)))
}

/// `raw` as a TOML scalar when it is one, else the bare text.
fn setting_value(source: &str) -> String {
    let raw = source.trim();
    match toml::from_str::<toml::Table>(&format!("value = {raw}")) {
        Ok(table) => match table.get("value") {
            Some(toml::Value::String(text)) => text.clone(),
            Some(toml::Value::Boolean(flag)) => flag.to_string(),
            Some(toml::Value::Integer(number)) => number.to_string(),
            _ => raw.to_owned(),
        },
        Err(_) => raw.to_owned(),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(EditorError::InvalidSetting {
            key: key.trim().to_owned(),
            value: value.to_owned(),
            expected: "true or false",
        }),
    }
}

fn parse_u16(key: &str, value: &str) -> Result<u16> {
    value.parse().map_err(|_| EditorError::InvalidSetting {
        key: key.trim().to_owned(),
        value: value.to_owned(),
        expected: "a number from 0 to 65535",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_match_documented_values() {
        let config = EditorConfig::default();

        assert!(!config.fullscreen);
        assert_eq!(config.min_lines, 0);
        assert_eq!(config.horizontal_margin, 4);
        assert_eq!(config.vertical_margin, 4);
        assert_eq!(config.tab_size, 4);
        assert!(config.show_line_numbers);
        assert!(config.confirm_quit_unsaved_changes);
        assert!(config.tab_emit_spaces);
        assert!(config.syntax_highlighting_dir.is_none());
    }

    #[rstest]
    fn parses_toml_values() {
        let source = "min_lines = 12\nshow_line_numbers = false\nsyntax_highlighting_dir = \"/etc/iedit\"\n";

        let config = EditorConfig::parse(source);

        assert_eq!(config.min_lines, 12);
        assert!(!config.show_line_numbers);
        assert_eq!(
            config.syntax_highlighting_dir.as_deref(),
            Some(Path::new("/etc/iedit"))
        );
        assert_eq!(config.tab_size, 4);
    }

    #[rstest]
    fn parses_bare_values_and_comments() {
        let source = "# my settings\ntab_size = 2\nfullscreen = on\nsyntax_highlighting_dir = /home/u/syn\n";

        let config = EditorConfig::parse(source);

        assert_eq!(config.tab_size, 2);
        assert!(config.fullscreen);
        assert_eq!(
            config.syntax_highlighting_dir.as_deref(),
            Some(Path::new("/home/u/syn"))
        );
    }

    #[rstest]
    fn trailing_toml_comments_are_dropped() {
        let config = EditorConfig::parse("vertical_margin = 2 # keep it tight\n");
        assert_eq!(config.vertical_margin, 2);
    }

    #[rstest]
    #[case::unknown_key("tab_size = 2\nedit_debounce_time_secs = 1\n")]
    #[case::wrong_type("tab_size = \"wide\"\ntab_size = 2\n")]
    #[case::not_a_setting("tab_size 4\ntab_size = 2\n")]
    #[case::section_header("[editor]\ntab_size = 2\n")]
    fn unusable_lines_do_not_discard_the_rest(#[case] source: &str) {
        let config = EditorConfig::parse(source);
        assert_eq!(config.tab_size, 2);
        assert!(config.show_line_numbers);
    }

    #[rstest]
    fn invalid_values_keep_the_default() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "tab_size = [\nmin_lines = many\n").expect("write config");

        assert_eq!(EditorConfig::load_from(&path), EditorConfig::default());
    }

    #[rstest]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = EditorConfig::load_from(&dir.path().join("absent.conf"));
        assert_eq!(config, EditorConfig::default());
    }

    #[rstest]
    fn load_reads_the_overridden_location() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("custom.conf");
        std::fs::write(&path, "vertical_margin = 1\n").expect("write config");

        let config = temp_env::with_var(CONFIG_PATH_ENV, Some(path.as_os_str()), EditorConfig::load);
        assert_eq!(config.vertical_margin, 1);
    }

    #[rstest]
    #[case::override_wins(Some("/tmp/alt.conf"), Some("/home/u"), Some("/tmp/alt.conf"))]
    #[case::empty_override_ignored(Some(""), Some("/home/u"), Some("/home/u/.iedit.conf"))]
    #[case::home_default(None, Some("/home/u"), Some("/home/u/.iedit.conf"))]
    #[case::nowhere(None, None, None)]
    fn config_path_resolution(
        #[case] override_path: Option<&str>,
        #[case] home: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let resolved = config_path(override_path.map(OsString::from), home.map(PathBuf::from));
        assert_eq!(resolved, expected.map(PathBuf::from));
    }

    #[rstest]
    #[case::bool_word("show_line_numbers", "false")]
    #[case::bool_digit("show_line_numbers", "0")]
    #[case::bool_no("show_line_numbers", "no")]
    #[case::bool_off("show_line_numbers", "OFF")]
    fn set_accepts_boolean_spellings(#[case] key: &str, #[case] value: &str) {
        let mut config = EditorConfig::default();
        config.set(key, value).expect("valid setting");
        assert!(!config.show_line_numbers);
    }

    #[rstest]
    fn set_changes_numeric_settings() {
        let mut config = EditorConfig::default();
        config.set("tab_size", " 8 ").expect("valid setting");
        assert_eq!(config.tab_size, 8);
    }

    #[rstest]
    #[case::unknown("colour", "red", "unknown setting")]
    #[case::bad_bool("fullscreen", "maybe", "true or false")]
    #[case::bad_number("tab_size", "-1", "a number")]
    fn set_rejects_bad_input(#[case] key: &str, #[case] value: &str, #[case] message: &str) {
        let mut config = EditorConfig::default();
        let err = config.set(key, value).expect_err("should be rejected");
        assert!(err.to_string().contains(message), "{err}");
        assert_eq!(config, EditorConfig::default());
    }
}
