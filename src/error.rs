//! Error types shared by the library and the CLI
//!
//! Per-comment analysis never fails: a syntax error in a probed comment is a
//! verdict, not an error. Everything here is either a configuration problem
//! (surfaced once, before any file is linted) or a per-file I/O problem.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while configuring the rule or linting files.
#[derive(Debug, Error)]
pub enum Error {
    /// A source or configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `ignoredCommentRegex` did not compile.
    #[error("invalid ignoredCommentRegex `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An option value was out of range.
    #[error("invalid option {name}: {message}")]
    InvalidOption { name: &'static str, message: String },

    /// The options file was malformed.
    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// The tree-sitter grammar could not be loaded.
    #[error("failed to load {language} grammar: {source}")]
    Grammar {
        language: &'static str,
        #[source]
        source: tree_sitter::LanguageError,
    },

    /// tree-sitter gave up on a source file.
    #[error("failed to parse {language} source")]
    Parse { language: &'static str },

    /// The file extension is not one the rule can lint.
    #[error("unsupported file type: {}", .0.display())]
    UnsupportedLanguage(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
