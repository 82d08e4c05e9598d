use serde::Serialize;
use std::fmt;

/// Raw token classification.
///
/// This is the whole vocabulary the parser core understands; operator and
/// keyword text is carried in `RawToken::value` and resolved against the
/// grammar's symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// An identifier or keyword.
    Name,
    String,
    Number,
    Regex,
    Comment,
    /// Punctuator text such as `+`, `===` or `{`.
    Operator,
    /// A hard line break.
    LineBreak,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Name => "name",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Regex => "regex",
            TokenKind::Comment => "comment",
            TokenKind::Operator => "operator",
            TokenKind::LineBreak => "line_break",
        }
    }

    /// Kinds the parser turns into literal-arity symbols.
    pub fn is_literal(self) -> bool {
        matches!(self, TokenKind::String | TokenKind::Number | TokenKind::Regex)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token produced by the scanner.
///
/// `line` is 1-based. `char_pos` is the 1-based character column of the
/// token's first character on that line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawToken {
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
    pub char_pos: usize,
}

impl RawToken {
    pub fn new(kind: TokenKind, value: impl Into<String>, line: usize, char_pos: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            line,
            char_pos,
        }
    }

    pub fn is_line_break(&self) -> bool {
        self.kind == TokenKind::LineBreak
    }
}

/// Punctuators recognized by the scanner, longest first so that a greedy
/// prefix match always picks the longest operator.
pub const PUNCTUATORS: &[&str] = &[
    ">>>=", "===", "!==", "**=", "<<=", ">>=", ">>>", "...", "==", "!=", "<=", ">=", "&&",
    "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "**", "=>",
    "<<", ">>", "+", "-", "*", "/", "%", "=", "<", ">", "!", "&", "|", "^", "~", "?", ":",
    ";", ",", ".", "(", ")", "[", "]", "{", "}",
];
