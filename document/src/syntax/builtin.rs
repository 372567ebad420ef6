//! Embedded syntax definitions and per-file selection.

use std::path::Path;

use super::DocumentSyntax;

/// Suffix of user definition files: `<dir>/<ext>.syntax.toml`.
pub const USER_DEFINITION_SUFFIX: &str = ".syntax.toml";

const BUILTIN_DEFINITIONS: &[(&str, &str)] = &[
    ("python", include_str!("definitions/python.toml")),
    ("javascript", include_str!("definitions/javascript.toml")),
    ("rust", include_str!("definitions/rust.toml")),
    ("bash", include_str!("definitions/bash.toml")),
    ("c", include_str!("definitions/c.toml")),
    ("cpp", include_str!("definitions/cpp.toml")),
    ("iedit_config", include_str!("definitions/iedit_config.toml")),
];

impl DocumentSyntax {
    /// Every built-in definition. Definitions that fail to compile are logged
    /// and skipped.
    #[must_use]
    pub fn builtins() -> Vec<Self> {
        BUILTIN_DEFINITIONS
            .iter()
            .filter_map(|(origin, source)| match Self::from_toml(source, origin) {
                Ok(syntax) => Some(syntax),
                Err(err) => {
                    log::error!("built-in syntax {origin} is broken: {err}");
                    None
                }
            })
            .collect()
    }

    /// Whether this definition applies to `path`.
    #[must_use]
    pub fn matches_path(&self, path: &Path) -> bool {
        let file_name = path.file_name().and_then(|name| name.to_str());
        let extension = path.extension().and_then(|ext| ext.to_str());

        file_name.is_some_and(|name| self.file_names.iter().any(|candidate| candidate == name))
            || extension.is_some_and(|ext| self.extensions.iter().any(|candidate| candidate == ext))
    }

    /// Select highlighting rules for `path`.
    ///
    /// A readable `<user_dir>/<ext>.syntax.toml` wins over the built-ins; a
    /// broken user file is logged and ignored.
    #[must_use]
    pub fn for_path(path: &Path, user_dir: Option<&Path>) -> Option<Self> {
        if let Some(user_syntax) = user_dir.and_then(|dir| Self::user_definition(path, dir)) {
            return Some(user_syntax);
        }

        Self::builtins()
            .into_iter()
            .find(|syntax| syntax.matches_path(path))
    }

    fn user_definition(path: &Path, dir: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        let candidate = dir.join(format!("{extension}{USER_DEFINITION_SUFFIX}"));
        if !candidate.is_file() {
            return None;
        }

        match Self::load_from_file(&candidate) {
            Ok(syntax) => {
                log::debug!("using syntax {} from {}", syntax.name, candidate.display());
                Some(syntax)
            }
            Err(err) => {
                log::warn!("ignoring {}: {err}", candidate.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use rstest::rstest;
    use std::fs;

    #[test]
    fn every_builtin_compiles() {
        assert_eq!(DocumentSyntax::builtins().len(), BUILTIN_DEFINITIONS.len());
    }

    #[rstest]
    #[case::python("script.py", Some("Python"))]
    #[case::javascript("app.js", Some("JavaScript"))]
    #[case::rust("src/main.rs", Some("Rust"))]
    #[case::bash("run.sh", Some("Bash"))]
    #[case::c("lib.h", Some("C"))]
    #[case::cpp("lib.cpp", Some("C++"))]
    #[case::config("/home/me/.iedit.conf", Some("iedit config"))]
    #[case::unknown("notes.txt", None)]
    #[case::no_extension("Makefile", None)]
    fn builtins_are_selected_by_path(#[case] path: &str, #[case] expected: Option<&str>) {
        let syntax = DocumentSyntax::for_path(Path::new(path), None);
        assert_eq!(syntax.map(|s| s.name).as_deref(), expected);
    }

    #[test]
    fn user_definition_takes_precedence() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(
            dir.path().join("py.syntax.toml"),
            "name = \"My Python\"\nextensions = [\"py\"]\n",
        )
        .expect("write");

        let syntax = DocumentSyntax::for_path(Path::new("a.py"), Some(dir.path())).expect("syntax");
        assert_eq!(syntax.name, "My Python");
    }

    #[test]
    fn broken_user_definition_falls_back_to_builtin() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("rs.syntax.toml"), "not = [valid").expect("write");

        let syntax = DocumentSyntax::for_path(Path::new("a.rs"), Some(dir.path())).expect("syntax");
        assert_eq!(syntax.name, "Rust");
    }

    #[test]
    fn python_docstring_and_keywords_are_highlighted() {
        let mut document = Document::from_strings(
            vec![
                "def main():".to_owned(),
                "    \"\"\"Doc".to_owned(),
                "    string\"\"\"".to_owned(),
                "    return 42  # answer".to_owned(),
            ],
            "main.py",
            false,
        );
        document.set_syntax(DocumentSyntax::for_path(Path::new("main.py"), None));

        assert_eq!(document.syntax_blocks().len(), 1);
        let keyword = &document.syntax_highlights(0)[0];
        assert_eq!(keyword.range, 0..3);
        assert_eq!(keyword.colour.to_string(), "#C586C0");

        let docstring = &document.syntax_highlights(2)[0];
        assert_eq!(docstring.range, 0..13);

        let last = document.syntax_highlights(3);
        let comment = last.last().expect("comment");
        assert_eq!(comment.range, 15..23);
        assert_eq!(comment.colour.to_string(), "#6A9955");
    }
}
