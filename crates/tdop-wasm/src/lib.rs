//! WASM bindings for the tdop parsing engine.
//!
//! Exposes `tokenize()`, `parse()` and `sexpr()` to JavaScript via
//! wasm-bindgen. Errors are thrown as JS errors carrying the line and column.

use serde::Serialize;
use tdop_lexer::{RawToken, Scanner};
use tdop_script::Node;
use wasm_bindgen::prelude::*;

/// Result of `parse()`: the statement list plus its S-expression rendering.
#[derive(Debug, Serialize)]
struct ParseOutput {
    statements: Vec<Node>,
    sexpr: Vec<String>,
}

fn scan(source: &str) -> Result<Vec<RawToken>, String> {
    Scanner::tokenize(source).map_err(|e| e.to_string())
}

fn parse_program(source: &str) -> Result<ParseOutput, String> {
    let statements = tdop_script::parse(source).map_err(|e| e.to_string())?;
    let sexpr = statements.iter().map(ToString::to_string).collect();
    Ok(ParseOutput { statements, sexpr })
}

/// Tokenize source into an array of `{ kind, value, line, char_pos }`.
#[wasm_bindgen]
pub fn tokenize(source: &str) -> Result<JsValue, JsError> {
    let tokens = scan(source).map_err(|e| JsError::new(&e))?;
    serde_wasm_bindgen::to_value(&tokens).map_err(|e| JsError::new(&e.to_string()))
}

/// Parse script source.
///
/// Returns `{ statements, sexpr }` where `statements` is the tagged syntax
/// tree and `sexpr` holds one S-expression string per statement.
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<JsValue, JsError> {
    let output = parse_program(source).map_err(|e| JsError::new(&e))?;
    serde_wasm_bindgen::to_value(&output).map_err(|e| JsError::new(&e.to_string()))
}

/// Parse script source and return only the S-expression strings.
#[wasm_bindgen]
pub fn sexpr(source: &str) -> Result<js_sys::Array, JsError> {
    let output = parse_program(source).map_err(|e| JsError::new(&e))?;
    Ok(output.sexpr.into_iter().map(JsValue::from).collect())
}

/// Get the engine version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tdop_lexer::TokenKind;

    // =========================================================================
    // Native tests (non-WASM): verify the pipeline behind each binding
    // =========================================================================

    #[test]
    fn test_empty_source() {
        let output = parse_program("").unwrap();
        assert!(output.statements.is_empty());
        assert!(output.sexpr.is_empty());
    }

    #[test]
    fn test_sexpr_matches_statements() {
        let output = parse_program("var a = 1\na = a * (2 + 3)").unwrap();
        assert_eq!(output.statements.len(), 2);
        assert_eq!(output.sexpr, vec!["(var (a 1))", "(= a (* a (+ 2 3)))"]);
    }

    #[test]
    fn test_tokens() {
        let tokens = scan("x += 1").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Name, TokenKind::Operator, TokenKind::Number]
        );
        assert_eq!(tokens[1].char_pos, 3);
    }

    #[test]
    fn test_errors_carry_position() {
        let err = parse_program("var x = (1 + 2").unwrap_err();
        assert!(err.contains("line 1"), "{err}");

        let err = scan("a # b").unwrap_err();
        assert!(err.contains("column 3"), "{err}");
    }

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }

    #[test]
    fn test_multiple_parses_share_nothing() {
        let first = parse_program("var x = 1\nx").unwrap();
        let second = parse_program("x").unwrap();
        assert_eq!(
            first.statements[1],
            Node::Name {
                name: "x".into(),
                declared: true
            }
        );
        assert_eq!(second.statements[0], Node::name("x"));
    }
}
