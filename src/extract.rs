//! Stripping comment syntax from a group
//!
//! Produces the plain text a group would contain if its delimiters were
//! removed. Indentation inside `//` groups is kept so the probe sees the code
//! the way it was written.

use std::sync::LazyLock;

use regex::Regex;

use crate::comments::CommentKind;
use crate::grouping::CommentGroup;

static BLOCK_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*/\*").expect("BLOCK_OPEN regex is invalid"));
static BLOCK_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*/\s*$").expect("BLOCK_CLOSE regex is invalid"));
static LINE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*//").expect("LINE_OPEN regex is invalid"));

/// The stripped text of one group, positioned at the group's source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl ExtractedContent {
    /// Number of lines, counting an empty text as one line.
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }
}

/// Strip the delimiters from a group's members.
pub fn extract(group: &CommentGroup) -> ExtractedContent {
    let text = match group.kind {
        CommentKind::Multi => {
            let joined = group.members.join("\n");
            let opened = BLOCK_OPEN.replace(&joined, "");
            BLOCK_CLOSE.replace(&opened, "").trim().to_string()
        }
        CommentKind::Single => group
            .members
            .iter()
            .map(|member| LINE_OPEN.replace(member, ""))
            .collect::<Vec<_>>()
            .join("\n"),
        CommentKind::Doc => group.members.join("\n"),
    };

    ExtractedContent {
        text,
        start: group.start,
        end: group.end,
    }
}
