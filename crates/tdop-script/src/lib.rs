//! tdop Script
//!
//! A small JavaScript-like language defined entirely through the
//! `tdop-parser` registration DSL: operators, constants, grouping, calls,
//! member access, function literals and the usual statements.
//!
//! # Example
//!
//! ```
//! let program = tdop_script::parse("var x = 1 + 2 * 3").unwrap();
//! assert_eq!(program[0].to_string(), "(var (x (+ 1 (* 2 3))))");
//! ```

pub mod ast;
pub mod grammar;

pub use ast::{Declaration, LiteralKind, Node};
pub use grammar::Script;
pub use tdop_parser::ParseError;

use tdop_lexer::RawToken;
use tdop_parser::Parser;

/// Parse source text into one node per top-level statement.
pub fn parse(source: &str) -> Result<Vec<Node>, ParseError> {
    Parser::parse_source(&Script, source)
}

/// Parse an already tokenized stream.
pub fn parse_tokens(tokens: Vec<RawToken>) -> Result<Vec<Node>, ParseError> {
    Parser::for_grammar(&Script, tokens)?.parse()
}
