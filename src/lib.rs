//! no-commented-code - report blocks of commented-out code in TypeScript and
//! JavaScript sources
//!
//! Comments are scanned with tree-sitter, merged into groups of adjacent
//! comments, stripped of their delimiters, and handed to a syntax probe.
//! Groups whose text parses as statements are reported.

pub mod comments;
pub mod config;
pub mod error;
pub mod extract;
pub mod file_utils;
pub mod grouping;
pub mod language;
pub mod lint;
pub mod oracle;
pub mod output;
pub mod rule;
pub mod scanner;
pub mod walker;

pub use comments::{CommentKind, CommentToken};
pub use config::{RuleSetting, load_options, parse_options};
pub use error::{Error, Result};
pub use grouping::{CommentGroup, group_comments};
pub use language::Language;
pub use lint::{FileReport, Finding, LintConfig, Position, lint_file, lint_files};
pub use oracle::{ProbeResult, SyntaxErrorKind, SyntaxProbe};
pub use output::{OutputConfig, OutputFormat, print_reports};
pub use rule::{FAILURE_STRING, Failure, NoCommentedCode, RULE_NAME, RuleOptions};
pub use scanner::scan_comments;
pub use walker::{WalkerConfig, discover_files};
