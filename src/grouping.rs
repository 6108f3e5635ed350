//! Merging adjacent comments into logical groups
//!
//! Consecutive `//` lines read as one paragraph, so they are analysed as one
//! unit. Two comments join the same group only when they have the same kind
//! and nothing but spaces or tabs separates them, apart from the single line
//! break that ends the previous comment's line. A blank line, code, or a
//! change of kind starts a new group.
//!
//! Doc blocks never join or start a group, but they still move the adjacency
//! cursor: the gap before a comment is always measured from the end of the
//! comment right before it, doc block or not.

use std::sync::LazyLock;

use regex::Regex;

use crate::comments::{CommentKind, CommentToken, classify};

/// Gap text allowed between two members of a group.
static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*$").expect("HORIZONTAL_SPACE regex is invalid"));

/// A maximal run of same-kind, contiguous comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    /// Never [`CommentKind::Doc`]
    pub kind: CommentKind,
    /// Raw member texts in source order
    pub members: Vec<String>,
    /// Start of the first member
    pub start: usize,
    /// End of the last member
    pub end: usize,
}

impl CommentGroup {
    fn open(kind: CommentKind, token: &CommentToken) -> Self {
        Self {
            kind,
            members: vec![token.text.clone()],
            start: token.start,
            end: token.end,
        }
    }

    fn push(&mut self, token: &CommentToken) {
        self.members.push(token.text.clone());
        self.end = token.end;
    }
}

/// State threaded through the grouping fold.
#[derive(Debug, Default)]
struct Grouping {
    closed: Vec<CommentGroup>,
    open: Option<CommentGroup>,
    /// End of the last comment seen, doc blocks included
    cursor: Option<usize>,
}

impl Grouping {
    fn step(mut self, source: &str, token: &CommentToken) -> Self {
        let previous_end = self.cursor.replace(token.end);

        let kind = classify(&token.text, token.syntax);
        if kind == CommentKind::Doc {
            return self;
        }

        let extends_open = match (&self.open, previous_end) {
            (Some(group), Some(end)) => group.kind == kind && is_adjacent(source, end, token.start),
            _ => false,
        };

        if extends_open {
            if let Some(group) = self.open.as_mut() {
                group.push(token);
            }
        } else if let Some(done) = self.open.replace(CommentGroup::open(kind, token)) {
            self.closed.push(done);
        }

        self
    }

    fn finish(mut self) -> Vec<CommentGroup> {
        self.closed.extend(self.open);
        self.closed
    }
}

/// Group an ordered comment stream, dropping doc blocks.
///
/// `source` is the full text the token offsets refer to; it is only read to
/// inspect the gaps between comments.
pub fn group_comments(source: &str, tokens: &[CommentToken]) -> Vec<CommentGroup> {
    tokens
        .iter()
        .fold(Grouping::default(), |state, token| state.step(source, token))
        .finish()
}

/// Whether the text between two comments keeps them in the same group.
///
/// One line terminator right after the previous comment is allowed (that is
/// the newline ending a `//` line); everything else must be spaces or tabs.
fn is_adjacent(source: &str, previous_end: usize, start: usize) -> bool {
    let Some(gap) = source.get(previous_end..start) else {
        return false;
    };
    let gap = gap
        .strip_prefix("\r\n")
        .or_else(|| gap.strip_prefix('\n'))
        .unwrap_or(gap);
    HORIZONTAL_SPACE.is_match(gap)
}
