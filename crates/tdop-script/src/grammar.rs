//! The script grammar.
//!
//! Binding powers, lowest to highest:
//!
//! | bp | symbols |
//! |----|---------|
//! | 10 | `=` `+=` `-=` `*=` `/=` (right) |
//! | 20 | `?` |
//! | 30 | `&&` `\|\|` (right) |
//! | 40 | `===` `!==` `==` `!=` `<` `<=` `>` `>=` |
//! | 50 | `+` `-` |
//! | 60 | `*` `/` `%` |
//! | 70 | `**` (right), prefix operators |
//! | 80 | `.` `[` `(` |

use crate::ast::{Declaration, Node};
use tdop_parser::symbol::{ASSIGNMENT_BINDING_POWER, NAME};
use tdop_parser::{Arity, Grammar, ParseError, Parser, Symbol, SymbolTable};
use tracing::trace;

/// The script language.
pub struct Script;

impl Grammar for Script {
    type Node = Node;

    fn language(&self) -> &str {
        "script"
    }

    fn build(&self, t: &mut SymbolTable<Node>) -> Result<(), ParseError> {
        for id in [";", ",", ")", "]", "}", ":", "else"] {
            t.symbol(id, 0);
        }

        t.define_identity("this");
        t.define_constant("true", "true");
        t.define_constant("false", "false");
        t.define_constant("null", "null");
        t.define_constant("undefined", "undefined");

        for id in ["=", "+=", "-=", "*=", "/="] {
            t.define_assignment(id, assignment);
        }
        t.define_operator_with("?", 20, ternary);
        t.define_operator_right_assoc("&&", 30);
        t.define_operator_right_assoc("||", 30);
        for id in ["===", "!==", "==", "!=", "<", "<=", ">", ">="] {
            t.define_operator(id, 40);
        }
        t.define_operator("+", 50);
        t.define_operator("-", 50);
        t.define_operator("*", 60);
        t.define_operator("/", 60);
        t.define_operator("%", 60);
        t.define_operator_right_assoc("**", 70);
        t.define_operator_with(".", 80, member);
        t.define_operator_with("[", 80, index);
        t.define_operator_with("(", 80, call);

        t.define_prefix("!");
        t.define_prefix("-");
        t.define_prefix("typeof");
        t.define_prefix_with("(", group);
        t.define_prefix_with("[", array);
        t.define_prefix_with("function", function_expression);

        t.define_statement("{", block);
        t.define_statement("var", var);
        t.define_statement("if", if_statement);
        t.define_statement("while", while_statement);
        t.define_statement("return", return_statement);
        t.define_statement("break", break_statement);
        t.define_statement("function", function_declaration);

        trace!(symbols = t.len(), "script grammar registered");
        Ok(())
    }
}

// =============================================================================
// Left denotations
// =============================================================================

fn assignment(p: &mut Parser<Node>, symbol: Symbol<Node>, left: Node) -> Result<Node, ParseError> {
    if !left.is_assignable() {
        return Err(symbol.error(format!("invalid assignment target for '{}'", symbol.id)));
    }
    let value = p.expression(ASSIGNMENT_BINDING_POWER - 1)?;
    Ok(Node::Assign {
        op: symbol.id,
        target: Box::new(left),
        value: Box::new(value),
    })
}

fn ternary(p: &mut Parser<Node>, _: Symbol<Node>, left: Node) -> Result<Node, ParseError> {
    let then = p.expression(0)?;
    p.expect(":")?;
    let otherwise = p.expression(0)?;
    Ok(Node::Ternary {
        condition: Box::new(left),
        then: Box::new(then),
        otherwise: Box::new(otherwise),
    })
}

fn member(p: &mut Parser<Node>, _: Symbol<Node>, left: Node) -> Result<Node, ParseError> {
    let property = p.token().clone();
    if property.arity != Arity::Name {
        return Err(property.error("expected a property name"));
    }
    p.advance(None)?;
    Ok(Node::Member {
        object: Box::new(left),
        property: property.text().to_string(),
    })
}

fn index(p: &mut Parser<Node>, _: Symbol<Node>, left: Node) -> Result<Node, ParseError> {
    let index = p.expression(0)?;
    p.expect("]")?;
    Ok(Node::Index {
        object: Box::new(left),
        index: Box::new(index),
    })
}

fn call(p: &mut Parser<Node>, _: Symbol<Node>, left: Node) -> Result<Node, ParseError> {
    let args = comma_list(p, ")")?;
    Ok(Node::Call {
        callee: Box::new(left),
        args,
    })
}

// =============================================================================
// Null denotations
// =============================================================================

fn group(p: &mut Parser<Node>, _: Symbol<Node>) -> Result<Node, ParseError> {
    let inner = p.expression(0)?;
    p.expect(")")?;
    Ok(inner)
}

fn array(p: &mut Parser<Node>, _: Symbol<Node>) -> Result<Node, ParseError> {
    let items = comma_list(p, "]")?;
    Ok(Node::Array { items })
}

fn function_expression(p: &mut Parser<Node>, _: Symbol<Node>) -> Result<Node, ParseError> {
    let name = optional_name(p)?;
    function_rest(p, name)
}

// =============================================================================
// Statement denotations
// =============================================================================

fn block(p: &mut Parser<Node>, _: Symbol<Node>) -> Result<Node, ParseError> {
    let body = block_body(p)?;
    Ok(Node::Block { body })
}

fn var(p: &mut Parser<Node>, _: Symbol<Node>) -> Result<Node, ParseError> {
    let mut declarations = Vec::new();
    loop {
        let name = declare(p, "variable")?;

        let init = if p.peek("=")? {
            p.advance(None)?;
            Some(p.expression(0)?)
        } else {
            None
        };
        declarations.push(Declaration { name, init });

        if !p.peek(",")? {
            break;
        }
        p.advance(None)?;
    }
    end_statement(p)?;
    Ok(Node::Var { declarations })
}

fn if_statement(p: &mut Parser<Node>, _: Symbol<Node>) -> Result<Node, ParseError> {
    let condition = parenthesized(p)?;
    let then = p.statement()?;
    let otherwise = if p.peek("else")? {
        p.advance(None)?;
        Some(Box::new(p.statement()?))
    } else {
        None
    };
    Ok(Node::If {
        condition: Box::new(condition),
        then: Box::new(then),
        otherwise,
    })
}

fn while_statement(p: &mut Parser<Node>, _: Symbol<Node>) -> Result<Node, ParseError> {
    let condition = parenthesized(p)?;
    let body = p.statement()?;
    Ok(Node::While {
        condition: Box::new(condition),
        body: Box::new(body),
    })
}

/// A value must start on the same line as `return`.
fn return_statement(p: &mut Parser<Node>, symbol: Symbol<Node>) -> Result<Node, ParseError> {
    let bare = p.token().line != symbol.line
        || p.token().is_end()
        || p.peek(";")?
        || p.peek("}")?;
    let value = if bare {
        None
    } else {
        Some(Box::new(p.expression(0)?))
    };
    end_statement(p)?;
    Ok(Node::Return { value })
}

fn break_statement(p: &mut Parser<Node>, _: Symbol<Node>) -> Result<Node, ParseError> {
    end_statement(p)?;
    Ok(Node::Break)
}

fn function_declaration(p: &mut Parser<Node>, _: Symbol<Node>) -> Result<Node, ParseError> {
    let name = optional_name(p)?;
    if name.is_none() {
        return Err(p.error("function declarations need a name"));
    }
    function_rest(p, name)
}

// =============================================================================
// Helpers
// =============================================================================

/// Comma-separated expressions up to and including `close`.
fn comma_list(p: &mut Parser<Node>, close: &str) -> Result<Vec<Node>, ParseError> {
    let mut items = Vec::new();
    if !p.peek(close)? {
        loop {
            items.push(p.expression(0)?);
            if !p.peek(",")? {
                break;
            }
            p.advance(None)?;
        }
    }
    p.expect(close)?;
    Ok(items)
}

fn parenthesized(p: &mut Parser<Node>) -> Result<Node, ParseError> {
    p.expect("(")?;
    let inner = p.expression(0)?;
    p.expect(")")?;
    Ok(inner)
}

/// `{ statements }` in a fresh scope. The closing brace is consumed after
/// the scope closes so the token behind it resolves in the outer scope.
fn block_body(p: &mut Parser<Node>) -> Result<Vec<Node>, ParseError> {
    let body = p.with_scope(|p| p.statements(&["}"]))?;
    p.expect("}")?;
    Ok(body)
}

fn end_statement(p: &mut Parser<Node>) -> Result<(), ParseError> {
    if p.peek(";")? {
        p.advance(None)?;
    }
    Ok(())
}

/// Reserve the current word in the active scope and move past it.
///
/// Words that resolve to a table entry (keywords, constants, word operators)
/// cannot be declared.
fn declare(p: &mut Parser<Node>, what: &str) -> Result<String, ParseError> {
    let token = p.token().clone();
    if token.arity != Arity::Name {
        return Err(token.error(format!("expected a {what} name")));
    }
    if token.id != NAME {
        return Err(token.error(format!(
            "'{}' is reserved and cannot be used as a {what} name",
            token.text()
        )));
    }
    p.scope_mut().reserve(&token);
    p.advance(None)?;
    Ok(token.text().to_string())
}

/// A function's name, reserved in the enclosing scope.
fn optional_name(p: &mut Parser<Node>) -> Result<Option<String>, ParseError> {
    if p.token().arity != Arity::Name {
        return Ok(None);
    }
    declare(p, "function").map(Some)
}

/// Parameters and body, both inside the function's own scope.
fn function_rest(p: &mut Parser<Node>, name: Option<String>) -> Result<Node, ParseError> {
    let (params, body) = p.with_scope(|p| {
        p.expect("(")?;
        let mut params = Vec::new();
        if !p.peek(")")? {
            loop {
                params.push(declare(p, "parameter")?);
                if !p.peek(",")? {
                    break;
                }
                p.advance(None)?;
            }
        }
        p.expect(")")?;
        p.expect("{")?;
        let body = p.statements(&["}"])?;
        Ok((params, body))
    })?;
    p.expect("}")?;
    Ok(Node::Function { name, params, body })
}
