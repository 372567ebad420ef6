//! Command-line arguments for the editor.

use std::path::PathBuf;

use clap::Parser;

/// A terminal text editor that opens inline, right beside your scrollback.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "iedit")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Edit a file:\n",
    "    $ iedit notes.md\n\n",
    "  Open a file at line 42:\n",
    "    $ iedit src/main.rs 42\n\n",
    "  Start with an unnamed buffer:\n",
    "    $ iedit\n\n",
    "Settings are read from $IEDIT_CONFIG or ~/.iedit.conf. Set IEDIT_LOG to a\n",
    "file path to write logs there.",
))]
pub struct Cli {
    /// File to edit; created on first save when it does not exist.
    pub path: Option<PathBuf>,

    /// 1-based line to open the file at.
    pub line: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::nothing(&["iedit"], None, None)]
    #[case::path(&["iedit", "notes.md"], Some("notes.md"), None)]
    #[case::path_and_line(&["iedit", "src/main.rs", "42"], Some("src/main.rs"), Some(42))]
    fn positional_arguments(
        #[case] args: &[&str],
        #[case] path: Option<&str>,
        #[case] line: Option<usize>,
    ) {
        let cli = Cli::try_parse_from(args).expect("valid arguments");
        assert_eq!(cli.path, path.map(PathBuf::from));
        assert_eq!(cli.line, line);
    }

    #[test]
    fn line_must_be_a_number() {
        assert!(Cli::try_parse_from(["iedit", "file", "forty"]).is_err());
    }
}
