//! Comment tokens and their classification
//!
//! A [`CommentToken`] is one comment as the scanner saw it: a byte range in
//! the source, the scanner's syntax kind, and the raw text including the
//! comment delimiters. [`classify`] decides which of three kinds the comment
//! is for grouping purposes:
//!
//! - **Doc**: a structured `/** ... */` block where every interior line
//!   carries a leading `* `. These are documentation and never analysed.
//! - **Multi**: any other block comment.
//! - **Single**: a `//` line comment.

/// The doc-block open marker, alone on the first line.
const DOC_OPEN: &str = "/**";
/// The doc-block close marker, alone on the last line.
const DOC_CLOSE: &str = "*/";
/// The marker every interior doc-block line must contain.
const DOC_LINE_MARKER: &str = "* ";
const LINE_COMMENT_MARKER: &str = "//";

/// How the scanner delimited a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    /// `// ...` up to the end of the line
    Line,
    /// `/* ... */`, possibly spanning lines
    Block,
}

/// One comment in a source file, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentToken {
    /// Byte offset of the first character of the comment
    pub start: usize,
    /// Byte offset just past the last character of the comment
    pub end: usize,
    pub syntax: SyntaxKind,
    /// The comment exactly as written, delimiters included
    pub text: String,
}

impl CommentToken {
    /// Build a token from a byte range of `source`, inferring the syntax kind
    /// from the delimiter.
    ///
    /// Returns `None` if the range is out of bounds or not on char boundaries.
    pub fn from_source(source: &str, start: usize, end: usize) -> Option<Self> {
        let text = source.get(start..end)?;
        let syntax = if text.starts_with("/*") {
            SyntaxKind::Block
        } else {
            SyntaxKind::Line
        };
        Some(Self {
            start,
            end,
            syntax,
            text: text.to_string(),
        })
    }
}

/// Classification of a comment for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// A run of `//` comments
    Single,
    /// A `/* */` block that is not a doc block
    Multi,
    /// A documentation block, excluded from analysis
    Doc,
}

/// Classify a comment from its raw text and the scanner's syntax kind.
pub fn classify(text: &str, syntax: SyntaxKind) -> CommentKind {
    if is_doc_block(text) {
        return CommentKind::Doc;
    }

    if syntax == SyntaxKind::Block {
        return CommentKind::Multi;
    }

    if text.trim().starts_with(LINE_COMMENT_MARKER) {
        return CommentKind::Single;
    }

    CommentKind::Multi
}

/// Check whether a comment is a structured documentation block.
///
/// The first line must be exactly `/**` and the last exactly `*/` (ignoring
/// surrounding whitespace), and every line in between must contain `* `.
/// A single-line `/** ... */` is not a doc block.
pub fn is_doc_block(text: &str) -> bool {
    let lines: Vec<&str> = text.split('\n').collect();
    let [first, interior @ .., last] = lines.as_slice() else {
        return false;
    };

    first.trim() == DOC_OPEN
        && last.trim() == DOC_CLOSE
        && interior
            .iter()
            .all(|line| line.trim().contains(DOC_LINE_MARKER))
}
