//! TOML syntax definition files.
//!
//! ```toml
//! name = "Python"
//! extensions = ["py"]
//!
//! [[rules]]
//! kind = "inline"
//! pattern = '#.*$'
//! colour = "#6A9955"
//!
//! [[rules]]
//! kind = "multiline"
//! start = '"{3}'
//! end = '"{3}'
//! colour = "#6A9955"
//! ```

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use super::{DocumentSyntax, Rgb, SyntaxRule};
use crate::error::{DocumentError, Result};

/// The on-disk form of a [`DocumentSyntax`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyntaxDefinition {
    /// Display name.
    pub name: String,
    /// Extensions the definition applies to.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Exact file names the definition applies to.
    #[serde(default)]
    pub file_names: Vec<String>,
    /// Rules in priority order.
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// The on-disk form of a [`SyntaxRule`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RuleDefinition {
    /// See [`SyntaxRule::Inline`].
    Inline {
        /// Regular expression.
        pattern: String,
        /// `#RRGGBB` colour.
        colour: String,
    },
    /// See [`SyntaxRule::Multiline`].
    Multiline {
        /// Regular expression opening a block.
        start: String,
        /// Regular expression closing a block.
        end: String,
        /// `#RRGGBB` colour.
        colour: String,
    },
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| DocumentError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })
}

impl TryFrom<RuleDefinition> for SyntaxRule {
    type Error = DocumentError;

    fn try_from(definition: RuleDefinition) -> Result<Self> {
        match definition {
            RuleDefinition::Inline { pattern, colour } => Ok(Self::Inline {
                pattern: compile(&pattern)?,
                colour: Rgb::try_from(colour.as_str())?,
            }),
            RuleDefinition::Multiline { start, end, colour } => Ok(Self::Multiline {
                start: compile(&start)?,
                end: compile(&end)?,
                colour: Rgb::try_from(colour.as_str())?,
            }),
        }
    }
}

impl TryFrom<SyntaxDefinition> for DocumentSyntax {
    type Error = DocumentError;

    fn try_from(definition: SyntaxDefinition) -> Result<Self> {
        let rules = definition
            .rules
            .into_iter()
            .map(SyntaxRule::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: definition.name,
            extensions: definition.extensions,
            file_names: definition.file_names,
            rules,
        })
    }
}

impl DocumentSyntax {
    /// Parse and compile a TOML definition. `origin` names the source in
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidSyntax`] for malformed TOML,
    /// [`DocumentError::InvalidPattern`] for a bad regular expression and
    /// [`DocumentError::InvalidColour`] for a bad colour.
    pub fn from_toml(source: &str, origin: &str) -> Result<Self> {
        let definition: SyntaxDefinition =
            toml::from_str(source).map_err(|err| DocumentError::InvalidSyntax {
                name: origin.to_owned(),
                reason: err.to_string(),
            })?;
        Self::try_from(definition)
    }

    /// Load a definition file.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] when the file cannot be read, otherwise
    /// as [`DocumentSyntax::from_toml`].
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml(&source, &path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn definitions_compile_in_order() {
        let syntax = DocumentSyntax::from_toml(
            r##"
name = "Demo"
extensions = ["demo"]

[[rules]]
kind = "inline"
pattern = '#.*$'
colour = "#6A9955"

[[rules]]
kind = "multiline"
start = '/\*'
end = '\*/'
colour = "#112233"
"##,
            "demo",
        )
        .expect("syntax");

        assert_eq!(syntax.name, "Demo");
        assert_eq!(syntax.extensions, vec!["demo"]);
        assert!(matches!(syntax.rules[0], SyntaxRule::Inline { .. }));
        assert!(matches!(syntax.rules[1], SyntaxRule::Multiline { .. }));
    }

    #[rstest]
    #[case::unknown_field("name = \"x\"\ncolour = \"#000000\"\n")]
    #[case::unknown_kind("name = \"x\"\n[[rules]]\nkind = \"block\"\npattern = 'a'\ncolour = \"#000000\"\n")]
    #[case::missing_name("extensions = [\"x\"]\n")]
    fn malformed_toml_is_invalid_syntax(#[case] source: &str) {
        let err = DocumentSyntax::from_toml(source, "broken").expect_err("should fail");
        assert!(
            matches!(&err, DocumentError::InvalidSyntax { name, .. } if name == "broken"),
            "unexpected error {err:?}"
        );
    }

    #[test]
    fn bad_pattern_is_reported() {
        let source = "name = \"x\"\n[[rules]]\nkind = \"inline\"\npattern = '('\ncolour = \"#000000\"\n";
        let err = DocumentSyntax::from_toml(source, "x").expect_err("should fail");
        assert!(matches!(err, DocumentError::InvalidPattern { pattern, .. } if pattern == "("));
    }

    #[test]
    fn bad_colour_is_reported() {
        let source = "name = \"x\"\n[[rules]]\nkind = \"inline\"\npattern = 'a'\ncolour = \"red\"\n";
        let err = DocumentSyntax::from_toml(source, "x").expect_err("should fail");
        assert!(matches!(err, DocumentError::InvalidColour { .. }));
    }

    #[test]
    fn load_from_file_reads_definition() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("toy.syntax.toml");
        fs::write(&path, "name = \"Toy\"\nextensions = [\"toy\"]\n").expect("write");

        let syntax = DocumentSyntax::load_from_file(&path).expect("load");
        assert_eq!(syntax.name, "Toy");
        assert!(syntax.rules.is_empty());
    }
}
