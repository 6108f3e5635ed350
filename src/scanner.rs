//! Comment scanning with tree-sitter
//!
//! Produces the ordered [`CommentToken`] stream the rule consumes. The grammar
//! is error-tolerant, so a file that does not fully parse still yields the
//! comments tree-sitter could place.

use tracing::debug;

use crate::comments::CommentToken;
use crate::error::{Error, Result};
use crate::language::Language;

const COMMENT_KIND: &str = "comment";

/// Collect every comment in `source`, in source order.
pub fn scan_comments(source: &str, language: Language) -> Result<Vec<CommentToken>> {
    let mut parser = language.parser()?;
    let tree = parser.parse(source, None).ok_or(Error::Parse {
        language: language.name(),
    })?;

    if tree.root_node().has_error() {
        debug!(language = language.name(), "source has syntax errors");
    }

    let mut tokens = Vec::new();
    let mut cursor = tree.walk();

    'walk: loop {
        let node = cursor.node();
        if node.kind() == COMMENT_KIND {
            if let Some(token) = CommentToken::from_source(source, node.start_byte(), node.end_byte()) {
                tokens.push(token);
            }
        } else if cursor.goto_first_child() {
            continue;
        }

        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::SyntaxKind;

    fn texts(source: &str, language: Language) -> Vec<String> {
        scan_comments(source, language)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_scan_no_comments() {
        assert!(texts("const a = 1;\n", Language::TypeScript).is_empty());
    }

    #[test]
    fn test_scan_line_and_block_comments() {
        let source = "// one\nconst a = 1; /* two */\n";
        let tokens = scan_comments(source, Language::TypeScript).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "// one");
        assert_eq!(tokens[0].syntax, SyntaxKind::Line);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 6));
        assert_eq!(tokens[1].text, "/* two */");
        assert_eq!(tokens[1].syntax, SyntaxKind::Block);
    }

    #[test]
    fn test_scan_nested_comments_in_order() {
        let source = "function f() {\n  // inner\n  return g(/* arg */ 1);\n}\n// after\n";
        assert_eq!(
            texts(source, Language::TypeScript),
            vec!["// inner", "/* arg */", "// after"]
        );
    }

    #[test]
    fn test_scan_ignores_comment_markers_in_strings() {
        let source = "const url = 'http://example.com';\nconst s = \"/* no */\";\n";
        assert!(texts(source, Language::TypeScript).is_empty());
    }

    #[test]
    fn test_scan_jsx_comment() {
        let source = "const el = <div>{/* hidden */}</div>;\n";
        assert_eq!(texts(source, Language::Tsx), vec!["/* hidden */"]);
    }

    #[test]
    fn test_scan_line_comment_excludes_line_break() {
        let source = "// one\r\n// two\r\n";
        assert_eq!(texts(source, Language::JavaScript), vec!["// one", "// two"]);
    }

    #[test]
    fn test_scan_tolerates_syntax_errors() {
        let source = "const = ;\n// still found\n";
        assert_eq!(texts(source, Language::TypeScript), vec!["// still found"]);
    }
}
