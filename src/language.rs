//! Source language detection and grammar selection
//!
//! Maps file extensions to the tree-sitter grammar used both for scanning a
//! file's comments and for probing whether comment text parses as code.

use std::path::Path;

use crate::error::{Error, Result};

/// Languages the rule can lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Plain JavaScript, including JSX (`.js`, `.jsx`, `.mjs`, `.cjs`)
    JavaScript,
    /// TypeScript without JSX (`.ts`, `.mts`, `.cts`)
    TypeScript,
    /// TypeScript with JSX (`.tsx`)
    Tsx,
}

impl Language {
    /// Detect language from a file extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use no_commented_code::language::Language;
    ///
    /// assert_eq!(Language::from_extension("ts"), Some(Language::TypeScript));
    /// assert_eq!(Language::from_extension("JSX"), Some(Language::JavaScript));
    /// assert_eq!(Language::from_extension("rs"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "mts" | "cts" => Some(Language::TypeScript),
            "tsx" => Some(Language::Tsx),
            _ => None,
        }
    }

    /// Detect language from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }

    /// Returns the human-readable name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Tsx => "TSX",
        }
    }

    /// The tree-sitter grammar for this language.
    ///
    /// JavaScript goes through the TSX grammar: it accepts JSX, and plain
    /// JavaScript never contains the angle-bracket casts TSX rejects.
    pub fn grammar(&self) -> tree_sitter::Language {
        match self {
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::JavaScript | Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// A tree-sitter parser configured for this language.
    pub fn parser(&self) -> Result<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.grammar())
            .map_err(|source| Error::Grammar {
                language: self.name(),
                source,
            })?;
        Ok(parser)
    }
}
