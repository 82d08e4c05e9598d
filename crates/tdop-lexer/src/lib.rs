//! tdop Lexer
//!
//! Tokenizes C-like source text into the flat stream of raw tokens the
//! parser consumes. The scanner is grammar-agnostic: every word comes out as
//! a `name` token and every punctuator as an `operator` token. Deciding which
//! words are keywords is the grammar's business.
//!
//! # Example
//!
//! ```
//! use tdop_lexer::{Scanner, TokenKind};
//!
//! let tokens = Scanner::tokenize("a + 1").unwrap();
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[1].kind, TokenKind::Operator);
//! ```

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{RawToken, TokenKind, PUNCTUATORS};

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at line {line}, column {column}: {message}")]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}
