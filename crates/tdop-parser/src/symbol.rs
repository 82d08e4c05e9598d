//! Symbols: the entries of a grammar's symbol table.
//!
//! A table entry is a template. Every token occurrence gets its own clone,
//! stamped with the occurrence's value, arity and position, so per-occurrence
//! data never leaks back into the shared table.

use crate::parser::Parser;
use crate::ParseError;
use std::fmt;
use tdop_lexer::TokenKind;

/// Id of the sentinel symbol produced once the token stream is exhausted.
pub const END: &str = "(end)";
/// Id of the generic identifier template.
pub const NAME: &str = "(name)";
/// Id of the generic literal template (strings, numbers, regexes).
pub const LITERAL: &str = "(literal)";
/// Id of the symbol materialized for hard line breaks.
pub const LINE_BREAK: &str = "(newline)";

/// Binding power the default prefix denotation parses its operand with.
pub const PREFIX_BINDING_POWER: u32 = 70;

/// Right binding power of assignment operators.
pub const ASSIGNMENT_BINDING_POWER: u32 = 10;

/// Custom null denotation: called with the occurrence that starts an expression.
pub type NudFn<N> = fn(&mut Parser<N>, Symbol<N>) -> Result<N, ParseError>;

/// Custom left denotation: called with the occurrence and the already-built
/// left operand.
pub type LedFn<N> = fn(&mut Parser<N>, Symbol<N>, N) -> Result<N, ParseError>;

/// Statement denotation: called with the occurrence that starts a statement,
/// after the parser has moved past it.
pub type StdFn<N> = fn(&mut Parser<N>, Symbol<N>) -> Result<N, ParseError>;

/// Classification of one token occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Name,
    Literal,
    Operator,
    Statement,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Arity::Name => "name",
            Arity::Literal => "literal",
            Arity::Operator => "operator",
            Arity::Statement => "statement",
        })
    }
}

/// Prefix-position behavior.
pub enum Nud<N> {
    /// Parse an operand at [`PREFIX_BINDING_POWER`] and build a unary node.
    Prefix,
    /// The occurrence is its own node (names, literals).
    Itself,
    /// Reserve the name in the active scope and become a literal carrying
    /// the symbol's constant value.
    Constant,
    Custom(NudFn<N>),
}

/// Infix-position behavior.
pub enum Led<N> {
    /// Right operand parsed at the operator's own binding power, so equal
    /// precedence groups to the left.
    Infix,
    /// Right operand parsed at one less than the operator's binding power, so
    /// equal precedence groups to the right.
    InfixRight,
    Custom(LedFn<N>),
}

impl<N> Clone for Nud<N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Nud<N> {}

impl<N> Clone for Led<N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Led<N> {}

impl<N> fmt::Debug for Nud<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nud::Prefix => f.write_str("Prefix"),
            Nud::Itself => f.write_str("Itself"),
            Nud::Constant => f.write_str("Constant"),
            Nud::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl<N> fmt::Debug for Led<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Led::Infix => f.write_str("Infix"),
            Led::InfixRight => f.write_str("InfixRight"),
            Led::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// A symbol table entry, or one occurrence cloned from it.
pub struct Symbol<N> {
    /// Operator text, keyword, or a category marker such as `(name)`.
    pub id: String,
    /// Left binding power. Zero means the symbol never continues an expression.
    pub lbp: u32,
    pub nud: Option<Nud<N>>,
    pub led: Option<Led<N>>,
    pub std: Option<StdFn<N>>,
    /// Value a constant turns into when parsed.
    pub constant: Option<String>,

    // Per-occurrence fields, stamped when the token is materialized.
    pub arity: Arity,
    pub kind: Option<TokenKind>,
    pub value: Option<String>,
    /// Set on bindings stored in a scope, and on occurrences resolved to one.
    pub reserved: bool,
    pub line: usize,
    pub char_pos: usize,
}

impl<N> Symbol<N> {
    pub fn new(id: impl Into<String>, lbp: u32) -> Self {
        Self {
            id: id.into(),
            lbp,
            nud: None,
            led: None,
            std: None,
            constant: None,
            arity: Arity::Operator,
            kind: None,
            value: None,
            reserved: false,
            line: 0,
            char_pos: 0,
        }
    }

    /// The occurrence's source text, falling back to the symbol id.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.id)
    }

    pub fn is(&self, id: &str) -> bool {
        self.id == id
    }

    pub fn is_end(&self) -> bool {
        self.id == END
    }

    pub fn is_line_break(&self) -> bool {
        self.id == LINE_BREAK
    }

    pub fn has_nud(&self) -> bool {
        self.nud.is_some()
    }

    pub fn has_led(&self) -> bool {
        self.led.is_some()
    }

    pub fn has_std(&self) -> bool {
        self.std.is_some()
    }

    /// Build a [`ParseError::Syntax`] located at this occurrence.
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            message: message.into(),
            line: self.line,
            char_pos: self.char_pos,
        }
    }
}

impl<N> Clone for Symbol<N> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            lbp: self.lbp,
            nud: self.nud,
            led: self.led,
            std: self.std,
            constant: self.constant.clone(),
            arity: self.arity,
            kind: self.kind,
            value: self.value.clone(),
            reserved: self.reserved,
            line: self.line,
            char_pos: self.char_pos,
        }
    }
}

impl<N> fmt::Debug for Symbol<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("id", &self.id)
            .field("lbp", &self.lbp)
            .field("arity", &self.arity)
            .field("value", &self.value)
            .field("nud", &self.nud)
            .field("led", &self.led)
            .field("std", &self.std.is_some())
            .field("line", &self.line)
            .field("char_pos", &self.char_pos)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Tree;

    #[test]
    fn test_new_symbol_is_bare() {
        let s: Symbol<Tree> = Symbol::new("+", 50);
        assert_eq!(s.id, "+");
        assert_eq!(s.lbp, 50);
        assert!(!s.has_nud());
        assert!(!s.has_led());
        assert!(!s.has_std());
        assert_eq!(s.arity, Arity::Operator);
    }

    #[test]
    fn test_text_prefers_value() {
        let mut s: Symbol<Tree> = Symbol::new(NAME, 0);
        assert_eq!(s.text(), "(name)");
        s.value = Some("x".into());
        assert_eq!(s.text(), "x");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut template: Symbol<Tree> = Symbol::new(LITERAL, 0);
        template.nud = Some(Nud::Itself);
        let mut occurrence = template.clone();
        occurrence.value = Some("42".into());
        occurrence.line = 3;
        assert_eq!(template.value, None);
        assert_eq!(template.line, 0);
        assert!(matches!(occurrence.nud, Some(Nud::Itself)));
    }

    #[test]
    fn test_error_is_positioned() {
        let mut s: Symbol<Tree> = Symbol::new("=", 10);
        s.line = 4;
        s.char_pos = 7;
        assert_eq!(
            s.error("bad target"),
            ParseError::Syntax {
                message: "bad target".into(),
                line: 4,
                char_pos: 7,
            }
        );
    }

    #[test]
    fn test_arity_display() {
        assert_eq!(Arity::Literal.to_string(), "literal");
        assert_eq!(Arity::Statement.to_string(), "statement");
    }
}
