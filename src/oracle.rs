//! Deciding whether comment text is code
//!
//! The text is parsed as the statement list of a function body with
//! tree-sitter. Nothing is executed. The parse gives a [`ProbeResult`]:
//!
//! - `Valid`: the text is a well-formed statement list.
//! - `SyntaxError(UnexpectedToken | UnexpectedEnd)`: the grammar rejected the
//!   text. Prose almost always ends up here.
//! - `SyntaxError(..)` of any other kind: the text is shaped like code but
//!   breaks a static rule of the language: a stray `break`, a duplicate
//!   `let`, an `import` inside a function, or `foo() = 1`.
//!
//! Only the first two kinds mean "not code".

use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

use regex::Regex;
use tree_sitter::{Node, Parser};

use crate::error::Result;
use crate::language::Language;

const PROBE_OPEN: &str = "function __probe__() {\n";
const PROBE_CLOSE: &str = "\n}";

const PLACEHOLDER: &str = "_";

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=",
    "||=", "??=",
];

const UPDATE_OPERATORS: &[&str] = &["++", "--"];

const LOOP_KINDS: &[&str] = &[
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
];

/// Nodes that start a new function scope; `break` and `continue` cannot
/// reach a loop outside them.
const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "generator_function_declaration",
    "generator_function",
    "arrow_function",
    "method_definition",
    "class_static_block",
];

/// Why a probed text is not a clean statement list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// The grammar hit a token it could not place
    UnexpectedToken,
    /// The input ended inside an unfinished construct
    UnexpectedEnd,
    /// `break` with nothing to break out of
    IllegalBreak,
    /// `continue` outside a loop
    IllegalContinue,
    /// A `let`/`const` name declared twice in one block
    DuplicateDeclaration(String),
    /// `import` declarations, which are only legal at module level
    ImportOutsideModule,
    /// An assignment or update whose target is not a reference
    InvalidAssignmentTarget,
}

impl SyntaxErrorKind {
    /// Whether the grammar itself rejected the text.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Self::UnexpectedToken | Self::UnexpectedEnd)
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken => write!(f, "Unexpected token"),
            Self::UnexpectedEnd => write!(f, "Unexpected end of input"),
            Self::IllegalBreak => write!(f, "Illegal break statement"),
            Self::IllegalContinue => write!(f, "Illegal continue statement"),
            Self::DuplicateDeclaration(name) => {
                write!(f, "Identifier '{}' has already been declared", name)
            }
            Self::ImportOutsideModule => {
                write!(f, "Cannot use import statement outside a module")
            }
            Self::InvalidAssignmentTarget => write!(f, "Invalid left-hand side in assignment"),
        }
    }
}

/// Outcome of probing a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Valid,
    SyntaxError(SyntaxErrorKind),
}

impl ProbeResult {
    /// Anything but a grammar rejection counts as code.
    pub fn looks_like_code(&self) -> bool {
        match self {
            ProbeResult::Valid => true,
            ProbeResult::SyntaxError(kind) => !kind.is_unexpected(),
        }
    }
}

/// A reusable syntax-only parser for one grammar.
pub struct SyntaxProbe {
    parser: Parser,
}

impl SyntaxProbe {
    pub fn new(language: Language) -> Result<Self> {
        Ok(Self {
            parser: language.parser()?,
        })
    }

    /// Parse `body` as the statements of a function.
    pub fn check(&mut self, body: &str) -> ProbeResult {
        let result = self.check_statements(body);
        let rejected = matches!(&result, ProbeResult::SyntaxError(kind) if kind.is_unexpected());
        if rejected && self.has_invalid_assignment_target(body) {
            return ProbeResult::SyntaxError(SyntaxErrorKind::InvalidAssignmentTarget);
        }
        result
    }

    fn check_statements(&mut self, body: &str) -> ProbeResult {
        let wrapped = format!("{}{}{}", PROBE_OPEN, body, PROBE_CLOSE);
        let body_end = PROBE_OPEN.len() + body.len();

        let Some(tree) = self.parser.parse(&wrapped, None) else {
            return ProbeResult::SyntaxError(SyntaxErrorKind::UnexpectedToken);
        };
        let root = tree.root_node();

        if let Some(node) = first_syntax_error(root) {
            if self.is_module_items(body) {
                return ProbeResult::SyntaxError(SyntaxErrorKind::ImportOutsideModule);
            }
            let kind = if node.is_missing() && node.start_byte() >= body_end {
                SyntaxErrorKind::UnexpectedEnd
            } else {
                SyntaxErrorKind::UnexpectedToken
            };
            return ProbeResult::SyntaxError(kind);
        }

        // A stray `}` closes the wrapper early and leaves the rest at top level
        let Some(statements) = probe_body(root, wrapped.len()) else {
            return ProbeResult::SyntaxError(SyntaxErrorKind::UnexpectedToken);
        };

        match early_error(statements, wrapped.as_bytes()) {
            Some(kind) => ProbeResult::SyntaxError(kind),
            None => ProbeResult::Valid,
        }
    }

    /// Whether `body` parses cleanly as a module containing imports.
    fn is_module_items(&mut self, body: &str) -> bool {
        let Some(tree) = self.parser.parse(body, None) else {
            return false;
        };
        let root = tree.root_node();
        if root.has_error() {
            return false;
        }
        let mut cursor = root.walk();
        let has_import = root
            .named_children(&mut cursor)
            .any(|child| child.kind() == "import_statement");
        has_import
    }

    /// Whether the grammar rejects `body` only because something that is not
    /// a reference sits on the target side of an assignment or update, as in
    /// `foo() = 1` or `++1`.
    ///
    /// Every such target that is itself a well-formed expression is swapped
    /// for a placeholder identifier of the same length. If the result is code,
    /// the targets were the only problem.
    fn has_invalid_assignment_target(&mut self, body: &str) -> bool {
        let operators = self.assignment_operators(body);

        let mut targets: Vec<Range<usize>> = Vec::new();
        for (range, is_update) in operators {
            let mut candidates = vec![operand_before(body, range.start)];
            if is_update {
                candidates.push(operand_after(body, range.end));
            }
            for candidate in candidates {
                let text = &body[candidate.clone()];
                if text.is_empty()
                    || is_identifier(text)
                    || targets.iter().any(|t| t.start < candidate.end && candidate.start < t.end)
                {
                    continue;
                }
                if self.is_expression(text) {
                    targets.push(candidate);
                }
            }
        }

        if targets.is_empty() {
            return false;
        }

        targets.sort_by_key(|t| t.start);
        let mut repaired = String::with_capacity(body.len());
        let mut last = 0;
        for target in &targets {
            repaired.push_str(&body[last..target.start]);
            repaired.push_str(&PLACEHOLDER.repeat(target.len()));
            last = target.end;
        }
        repaired.push_str(&body[last..]);

        self.check_statements(&repaired).looks_like_code()
    }

    /// Byte ranges in `body` of every assignment or update operator token,
    /// flagged `true` for `++`/`--`.
    fn assignment_operators(&mut self, body: &str) -> Vec<(Range<usize>, bool)> {
        let wrapped = format!("{}{}{}", PROBE_OPEN, body, PROBE_CLOSE);
        let body_range = PROBE_OPEN.len()..PROBE_OPEN.len() + body.len();
        let Some(tree) = self.parser.parse(&wrapped, None) else {
            return Vec::new();
        };

        let mut operators = Vec::new();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            if node.child_count() == 0 {
                let kind = node.kind();
                let is_update = UPDATE_OPERATORS.contains(&kind);
                if !node.is_missing()
                    && (is_update || ASSIGNMENT_OPERATORS.contains(&kind))
                    && node.start_byte() >= body_range.start
                    && node.end_byte() <= body_range.end
                {
                    let start = node.start_byte() - body_range.start;
                    let end = node.end_byte() - body_range.start;
                    operators.push((start..end, is_update));
                }
                continue;
            }
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        operators
    }

    /// Whether `text` is a single well-formed expression.
    fn is_expression(&mut self, text: &str) -> bool {
        let Some(tree) = self.parser.parse(format!("({});", text), None) else {
            return false;
        };
        let root = tree.root_node();
        !root.has_error()
            && root.named_child_count() == 1
            && root
                .named_child(0)
                .is_some_and(|child| child.kind() == "expression_statement")
    }
}

/// Decide whether stripped comment text is code.
///
/// Lines are trimmed and those matching `ignored` are dropped first. Nothing
/// left (or only blank lines) means not code.
pub fn looks_like_code(text: &str, ignored: &Regex, probe: &mut SyntaxProbe) -> bool {
    let cleared = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !ignored.is_match(line))
        .collect::<Vec<_>>()
        .join("\n");

    if cleared.trim().is_empty() {
        return false;
    }

    let result = probe.check(&cleared);
    tracing::trace!(?result, "probed comment text");
    result.looks_like_code()
}

fn first_syntax_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_syntax_error);
    found
}

/// The statement block of the wrapper, if the wrapper is the whole program.
fn probe_body(root: Node<'_>, input_len: usize) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    let items: Vec<Node<'_>> = root
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();

    match items.as_slice() {
        [function]
            if function.kind() == "function_declaration" && function.end_byte() == input_len =>
        {
            function.child_by_field_name("body")
        }
        _ => None,
    }
}

/// First static-semantics violation under `body`, in source order.
fn early_error(body: Node<'_>, source: &[u8]) -> Option<SyntaxErrorKind> {
    let mut stack = vec![body];

    while let Some(node) = stack.pop() {
        match node.kind() {
            "break_statement" if !has_jump_target(node, true) => {
                return Some(SyntaxErrorKind::IllegalBreak);
            }
            "continue_statement" if !has_jump_target(node, false) => {
                return Some(SyntaxErrorKind::IllegalContinue);
            }
            "statement_block" => {
                if let Some(name) = duplicate_lexical_name(node, source) {
                    return Some(SyntaxErrorKind::DuplicateDeclaration(name));
                }
            }
            // Outside a generator `yield` is a plain identifier, so
            // `yield foo` is two identifiers in a row
            "yield_expression" if yields_value(node) && !in_generator(node) => {
                return Some(SyntaxErrorKind::UnexpectedToken);
            }
            _ => {}
        }

        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    None
}

/// Whether a `break` (or `continue`) has an enclosing statement to jump to
/// within the current function.
fn has_jump_target(jump: Node<'_>, is_break: bool) -> bool {
    let labelled = jump.child_by_field_name("label").is_some();
    let mut current = jump.parent();

    while let Some(node) = current {
        let kind = node.kind();
        if FUNCTION_KINDS.contains(&kind) {
            return false;
        }
        if labelled && kind == "labeled_statement" {
            return true;
        }
        if !labelled && LOOP_KINDS.contains(&kind) {
            return true;
        }
        if !labelled && is_break && kind == "switch_statement" {
            return true;
        }
        current = node.parent();
    }

    false
}

/// A `let`/`const` identifier declared twice directly in `block`.
fn duplicate_lexical_name(block: Node<'_>, source: &[u8]) -> Option<String> {
    let mut seen = HashSet::new();
    let mut cursor = block.walk();

    for declaration in block.named_children(&mut cursor) {
        if declaration.kind() != "lexical_declaration" {
            continue;
        }
        let mut inner = declaration.walk();
        for declarator in declaration.named_children(&mut inner) {
            let Some(name) = declarator.child_by_field_name("name") else {
                continue;
            };
            if name.kind() != "identifier" {
                continue;
            }
            let Ok(text) = name.utf8_text(source) else {
                continue;
            };
            if !seen.insert(text) {
                return Some(text.to_string());
            }
        }
    }

    None
}

/// `yield value`, as opposed to a bare `yield` or `yield* value`, both of
/// which also read as identifier expressions.
fn yields_value(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let delegates = node.children(&mut cursor).any(|child| child.kind() == "*");
    !delegates && node.named_child_count() > 0
}

fn in_generator(node: Node<'_>) -> bool {
    let mut current = node.parent();

    while let Some(ancestor) = current {
        match ancestor.kind() {
            "generator_function_declaration" | "generator_function" => return true,
            "method_definition" => {
                let mut cursor = ancestor.walk();
                let starred = ancestor.children(&mut cursor).any(|child| child.kind() == "*");
                return starred;
            }
            kind if FUNCTION_KINDS.contains(&kind) => return false,
            _ => {}
        }
        current = ancestor.parent();
    }

    false
}

/// The expression ending right before `end`, back to the nearest statement
/// boundary at the same bracket depth. Surrounding whitespace is excluded.
fn operand_before(body: &str, end: usize) -> Range<usize> {
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in body[..end].char_indices().rev() {
        match c {
            ')' | ']' => depth += 1,
            '(' | '[' if depth == 0 => {
                start = i + 1;
                break;
            }
            '(' | '[' => depth -= 1,
            ';' | '{' | '}' | ',' | '=' | '\n' if depth == 0 => {
                start = i + 1;
                break;
            }
            _ => {}
        }
    }

    trimmed(body, start..end)
}

/// The expression starting right after `start`, up to the nearest statement
/// boundary at the same bracket depth. Surrounding whitespace is excluded.
fn operand_after(body: &str, start: usize) -> Range<usize> {
    let mut depth = 0usize;
    let mut end = body.len();

    for (i, c) in body[start..].char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' if depth == 0 => {
                end = start + i;
                break;
            }
            ')' | ']' => depth -= 1,
            ';' | '{' | '}' | ',' | '=' | '\n' if depth == 0 => {
                end = start + i;
                break;
            }
            _ => {}
        }
    }

    trimmed(body, start..end)
}

fn trimmed(body: &str, range: Range<usize>) -> Range<usize> {
    let text = &body[range.clone()];
    let start = range.start + (text.len() - text.trim_start().len());
    let end = range.end - (text.len() - text.trim_end().len());
    start..end.max(start)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe() -> SyntaxProbe {
        SyntaxProbe::new(Language::TypeScript).unwrap()
    }

    fn default_ignore() -> Regex {
        Regex::new(r"^(\w+$|TODO|FIXME)").unwrap()
    }

    #[test]
    fn test_check_valid_statements() {
        let mut probe = probe();
        assert_eq!(probe.check("var c = '';\nc += 'test';"), ProbeResult::Valid);
        assert_eq!(
            probe.check("function printTips() {\ntips.forEach((tip, i) => console.log(tip));\n}"),
            ProbeResult::Valid
        );
    }

    #[test]
    fn test_check_return_is_allowed() {
        assert_eq!(probe().check("return 1;"), ProbeResult::Valid);
    }

    #[test]
    fn test_check_prose_is_unexpected() {
        let result = probe().check("just a comment");
        assert!(matches!(result, ProbeResult::SyntaxError(ref k) if k.is_unexpected()));
        assert!(!result.looks_like_code());
    }

    #[test]
    fn test_check_unclosed_block_is_unexpected() {
        let result = probe().check("function test(a) {\nreturn true;");
        assert!(!result.looks_like_code(), "{:?}", result);
    }

    #[test]
    fn test_check_stray_closing_brace() {
        assert_eq!(
            probe().check("}\nfunction other() {"),
            ProbeResult::SyntaxError(SyntaxErrorKind::UnexpectedToken)
        );
    }

    #[test]
    fn test_check_illegal_break() {
        let result = probe().check("foo();\nbreak;");
        assert_eq!(result, ProbeResult::SyntaxError(SyntaxErrorKind::IllegalBreak));
        assert!(result.looks_like_code());
    }

    #[test]
    fn test_check_invalid_assignment_target() {
        let mut probe = probe();
        for body in ["1 = 2;\nfoo();", "foo() = 1;", "if (x) {\nfoo() = bar(1, 2);\n}"] {
            let result = probe.check(body);
            assert_eq!(
                result,
                ProbeResult::SyntaxError(SyntaxErrorKind::InvalidAssignmentTarget),
                "{:?}",
                body
            );
            assert!(result.looks_like_code());
        }
    }

    #[test]
    fn test_check_invalid_assignment_target_javascript() {
        let mut probe = SyntaxProbe::new(Language::JavaScript).unwrap();
        assert!(probe.check("1 = 2;\nfoo();").looks_like_code());
    }

    #[test]
    fn test_check_prose_with_equals_is_unexpected() {
        let mut probe = probe();
        assert!(!probe.check("the result = what we expect").looks_like_code());
        assert!(!probe.check("x = y but only sometimes").looks_like_code());
    }

    #[test]
    fn test_check_yield_outside_generator() {
        let mut probe = probe();
        assert_eq!(
            probe.check("yield foo\nbar()"),
            ProbeResult::SyntaxError(SyntaxErrorKind::UnexpectedToken)
        );
        assert_eq!(
            probe.check("function* gen() {\nyield foo;\n}"),
            ProbeResult::Valid
        );
        assert_eq!(
            probe.check("const o = {\n*gen() {\nyield foo;\n}\n};"),
            ProbeResult::Valid
        );
    }

    #[test]
    fn test_operand_ranges() {
        let body = "a; foo(1) = 2";
        let eq = body.find('=').unwrap();
        assert_eq!(&body[operand_before(body, eq)], "foo(1)");
        let body = "++bar(x);";
        assert_eq!(&body[operand_after(body, 2)], "bar(x)");
    }

    #[test]
    fn test_check_break_inside_loop_is_valid() {
        assert_eq!(
            probe().check("while (true) {\nbreak;\n}"),
            ProbeResult::Valid
        );
        assert_eq!(
            probe().check("switch (a) {\ncase 1:\nbreak;\n}"),
            ProbeResult::Valid
        );
    }

    #[test]
    fn test_check_break_does_not_cross_functions() {
        assert_eq!(
            probe().check("for (;;) {\nitems.forEach(() => {\nbreak;\n});\n}"),
            ProbeResult::SyntaxError(SyntaxErrorKind::IllegalBreak)
        );
    }

    #[test]
    fn test_check_illegal_continue() {
        assert_eq!(
            probe().check("switch (a) {\ncase 1:\ncontinue;\n}"),
            ProbeResult::SyntaxError(SyntaxErrorKind::IllegalContinue)
        );
    }

    #[test]
    fn test_check_duplicate_declaration() {
        let result = probe().check("let a = 1;\nlet a = 2;");
        assert_eq!(
            result,
            ProbeResult::SyntaxError(SyntaxErrorKind::DuplicateDeclaration("a".to_string()))
        );
        assert!(result.looks_like_code());
    }

    #[test]
    fn test_check_shadowing_in_nested_block_is_valid() {
        assert_eq!(
            probe().check("let a = 1;\nif (b) {\nlet a = 2;\n}"),
            ProbeResult::Valid
        );
    }

    #[test]
    fn test_check_imports() {
        let result = probe().check("import { a } from './a';\nimport b from './b';");
        assert!(result.looks_like_code(), "{:?}", result);
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(
            SyntaxErrorKind::DuplicateDeclaration("x".to_string()).to_string(),
            "Identifier 'x' has already been declared"
        );
        assert_eq!(
            SyntaxErrorKind::UnexpectedEnd.to_string(),
            "Unexpected end of input"
        );
    }

    #[test]
    fn test_looks_like_code_statements() {
        let mut probe = probe();
        assert!(looks_like_code(
            " var c = '';\n c += 'test';",
            &default_ignore(),
            &mut probe
        ));
    }

    #[test]
    fn test_looks_like_code_prose() {
        let mut probe = probe();
        assert!(!looks_like_code(
            " some comment\n it should work",
            &default_ignore(),
            &mut probe
        ));
    }

    #[test]
    fn test_looks_like_code_drops_ignored_lines() {
        let mut probe = probe();
        let text = " TODO: remove this code\n function test(a) {\n   return true;  \n }";
        assert!(looks_like_code(text, &default_ignore(), &mut probe));
    }

    #[test]
    fn test_looks_like_code_everything_ignored() {
        let mut probe = probe();
        assert!(!looks_like_code(" text\n text", &default_ignore(), &mut probe));
        assert!(!looks_like_code(
            "TODO: one\nFIXME: two",
            &default_ignore(),
            &mut probe
        ));
    }

    #[test]
    fn test_looks_like_code_blank_lines_only() {
        let mut probe = probe();
        assert!(!looks_like_code("\n  \n", &default_ignore(), &mut probe));
    }

    #[test]
    fn test_looks_like_code_custom_pattern() {
        let mut probe = probe();
        let ignore_all = Regex::new(".*").unwrap();
        assert!(!looks_like_code(
            "foo();\nbar();",
            &ignore_all,
            &mut probe
        ));
    }
}
