//! The `no-commented-code` rule
//!
//! Wires the pipeline together: comment tokens are grouped, stripped, and
//! each group long enough to judge is probed. Groups that look like code
//! become [`Failure`]s covering the group's source range.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::comments::CommentToken;
use crate::error::{Error, Result};
use crate::extract::{ExtractedContent, extract};
use crate::grouping::group_comments;
use crate::language::Language;
use crate::oracle::{SyntaxProbe, looks_like_code};
use crate::scanner::scan_comments;

pub const RULE_NAME: &str = "no-commented-code";
pub const FAILURE_STRING: &str = "Commented code is forbidden.";
pub const DEFAULT_IGNORED_COMMENT_REGEX: &str = r"^(\w+$|TODO|FIXME)";
pub const DEFAULT_MIN_LINE_COUNT: usize = 2;

/// User-facing rule options, as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RuleOptions {
    /// Lines matching this pattern (after trimming) are dropped before probing
    pub ignored_comment_regex: String,
    /// Groups with fewer lines than this are never reported
    pub min_line_count: usize,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            ignored_comment_regex: DEFAULT_IGNORED_COMMENT_REGEX.to_string(),
            min_line_count: DEFAULT_MIN_LINE_COUNT,
        }
    }
}

impl RuleOptions {
    /// Validate the options and build a ready-to-run rule.
    pub fn compile(&self) -> Result<NoCommentedCode> {
        if self.min_line_count == 0 {
            return Err(Error::InvalidOption {
                name: "minLineCount",
                message: "must be a positive integer".to_string(),
            });
        }

        let ignored = Regex::new(&self.ignored_comment_regex).map_err(|source| {
            Error::InvalidPattern {
                pattern: self.ignored_comment_regex.clone(),
                source,
            }
        })?;

        Ok(NoCommentedCode {
            ignored,
            min_line_count: self.min_line_count,
        })
    }
}

/// One reported group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Byte offset of the group start
    pub offset: usize,
    /// Byte length of the group
    pub length: usize,
    pub message: &'static str,
}

/// A compiled rule. Holds no per-file state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct NoCommentedCode {
    ignored: Regex,
    min_line_count: usize,
}

impl NoCommentedCode {
    /// Scan `source` for comments and report the code-like groups.
    pub fn check_source(&self, source: &str, language: Language) -> Result<Vec<Failure>> {
        let tokens = scan_comments(source, language)?;
        let mut probe = SyntaxProbe::new(language)?;
        Ok(self.apply_with(source, &tokens, &mut probe))
    }

    /// Report the code-like groups among already-scanned comments, probing
    /// with the TypeScript grammar.
    pub fn apply(&self, source: &str, tokens: &[CommentToken]) -> Result<Vec<Failure>> {
        let mut probe = SyntaxProbe::new(Language::TypeScript)?;
        Ok(self.apply_with(source, tokens, &mut probe))
    }

    /// Report the code-like groups among `tokens`, in source order.
    pub fn apply_with(
        &self,
        source: &str,
        tokens: &[CommentToken],
        probe: &mut SyntaxProbe,
    ) -> Vec<Failure> {
        let contents: Vec<ExtractedContent> = group_comments(source, tokens)
            .iter()
            .map(extract)
            .collect();
        self.report(&contents, probe)
    }

    /// Turn extracted groups into failures.
    pub fn report(&self, contents: &[ExtractedContent], probe: &mut SyntaxProbe) -> Vec<Failure> {
        contents
            .iter()
            .filter(|content| content.line_count() >= self.min_line_count)
            .filter(|content| {
                let code = looks_like_code(&content.text, &self.ignored, probe);
                debug!(
                    start = content.start,
                    end = content.end,
                    lines = content.line_count(),
                    code,
                    "judged comment group"
                );
                code
            })
            .map(|content| Failure {
                offset: content.start,
                length: content.end - content.start,
                message: FAILURE_STRING,
            })
            .collect()
    }
}

impl Default for NoCommentedCode {
    fn default() -> Self {
        Self {
            ignored: Regex::new(DEFAULT_IGNORED_COMMENT_REGEX)
                .expect("default ignoredCommentRegex is invalid"),
            min_line_count: DEFAULT_MIN_LINE_COUNT,
        }
    }
}
