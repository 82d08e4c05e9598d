//! tdop Parser
//!
//! A top-down operator precedence (Pratt) parsing engine. A grammar fills a
//! [`SymbolTable`] once per language through a small registration DSL; every
//! parse then walks a flat raw token stream, materializing a fresh
//! [`Symbol`] per token and letting each symbol's null, left and statement
//! denotations build the tree.
//!
//! ```text
//! Grammar::build ─▶ SymbolTable (memoized per language in GrammarRegistry)
//! Vec<RawToken> ─▶ Parser ─▶ statements() ─▶ statement() ─▶ expression(rbp)
//! ```
//!
//! The node type is the grammar's choice; it only has to implement
//! [`TreeNode`] so that the built-in prefix and infix behaviors can construct
//! it.

pub mod node;
pub mod parser;
pub mod registry;
pub mod scope;
pub mod symbol;
pub mod table;

#[cfg(test)]
pub(crate) mod fixtures;

pub use node::TreeNode;
pub use parser::Parser;
pub use registry::{Grammar, GrammarRegistry};
pub use scope::Scope;
pub use symbol::{Arity, Led, LedFn, Nud, NudFn, StdFn, Symbol};
pub use table::SymbolTable;
pub use tdop_lexer::{LexerError, RawToken, TokenKind};

/// Parser error. Every variant is fatal for the current parse.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The grammar is misconfigured: no language identifier, or a table that
    /// fails validation after `build()`.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A raw token has no matching entry in the symbol table.
    #[error("Unknown operator ({arity}:'{text}') at line {line}, position {char_pos}")]
    UnknownOperator {
        text: String,
        arity: TokenKind,
        line: usize,
        char_pos: usize,
    },

    /// `advance` was asked for one symbol and found another.
    #[error("Expected '{expected}' but got '{found}' at line {line}, position {char_pos}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        char_pos: usize,
    },

    /// A symbol with no prefix behavior appeared where an expression begins.
    #[error("'{id}' cannot begin an expression at line {line}, position {char_pos}")]
    MissingNullDenotation {
        id: String,
        line: usize,
        char_pos: usize,
    },

    /// Raised by grammar callbacks for language-level rules.
    #[error("Syntax error at line {line}, position {char_pos}: {message}")]
    Syntax {
        message: String,
        line: usize,
        char_pos: usize,
    },

    /// `scope_pop` was called on the root scope.
    #[error("Scope stack underflow: cannot pop the root scope")]
    ScopeUnderflow,

    #[error(transparent)]
    Lexer(#[from] LexerError),
}
