//! Syntax tree for the script language.
//!
//! `Display` renders nodes as S-expressions, which is what the CLI prints and
//! what most tests compare against.

use serde::Serialize;
use std::fmt;
use tdop_lexer::TokenKind;
use tdop_parser::{Arity, Symbol, TreeNode};

/// A statement or expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// An identifier. `declared` is set when it resolved to a `var`,
    /// parameter or function binding in an enclosing scope.
    Name { name: String, declared: bool },
    Literal { kind: LiteralKind, value: String },
    Unary { op: String, operand: Box<Node> },
    Binary { op: String, left: Box<Node>, right: Box<Node> },
    Assign { op: String, target: Box<Node>, value: Box<Node> },
    Ternary {
        condition: Box<Node>,
        then: Box<Node>,
        otherwise: Box<Node>,
    },
    Member { object: Box<Node>, property: String },
    Index { object: Box<Node>, index: Box<Node> },
    Call { callee: Box<Node>, args: Vec<Node> },
    Array { items: Vec<Node> },
    Function {
        name: Option<String>,
        params: Vec<String>,
        body: Vec<Node>,
    },
    Block { body: Vec<Node> },
    Var { declarations: Vec<Declaration> },
    If {
        condition: Box<Node>,
        then: Box<Node>,
        otherwise: Option<Box<Node>>,
    },
    While { condition: Box<Node>, body: Box<Node> },
    Return { value: Option<Box<Node>> },
    Break,
}

/// One `name = init` entry of a `var` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub init: Option<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    String,
    Number,
    Regex,
    Boolean,
    Null,
    Undefined,
}

impl Node {
    pub fn name(name: &str) -> Self {
        Node::Name {
            name: name.to_string(),
            declared: false,
        }
    }

    pub fn number(value: &str) -> Self {
        Node::Literal {
            kind: LiteralKind::Number,
            value: value.to_string(),
        }
    }

    /// Whether the node may appear on the left of an assignment.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            Node::Name { .. } | Node::Member { .. } | Node::Index { .. }
        )
    }
}

impl TreeNode for Node {
    fn leaf(symbol: Symbol<Self>) -> Self {
        let value = symbol.text().to_string();
        match symbol.arity {
            Arity::Literal => {
                let kind = match symbol.kind {
                    Some(TokenKind::String) => LiteralKind::String,
                    Some(TokenKind::Number) => LiteralKind::Number,
                    Some(TokenKind::Regex) => LiteralKind::Regex,
                    _ => match value.as_str() {
                        "true" | "false" => LiteralKind::Boolean,
                        "null" => LiteralKind::Null,
                        _ => LiteralKind::Undefined,
                    },
                };
                Node::Literal { kind, value }
            }
            _ => Node::Name {
                name: value,
                declared: symbol.reserved,
            },
        }
    }

    fn unary(symbol: Symbol<Self>, operand: Self) -> Self {
        Node::Unary {
            op: symbol.id,
            operand: Box::new(operand),
        }
    }

    fn binary(symbol: Symbol<Self>, left: Self, right: Self) -> Self {
        Node::Binary {
            op: symbol.id,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

fn write_all(f: &mut fmt::Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    for node in nodes {
        write!(f, " {node}")?;
    }
    Ok(())
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Name { name, .. } => f.write_str(name),
            Node::Literal {
                kind: LiteralKind::String,
                value,
            } => write!(f, "{value:?}"),
            Node::Literal { value, .. } => f.write_str(value),
            Node::Unary { op, operand } => write!(f, "({op} {operand})"),
            Node::Binary { op, left, right } => write!(f, "({op} {left} {right})"),
            Node::Assign { op, target, value } => write!(f, "({op} {target} {value})"),
            Node::Ternary {
                condition,
                then,
                otherwise,
            } => write!(f, "(? {condition} {then} {otherwise})"),
            Node::Member { object, property } => write!(f, "(. {object} {property})"),
            Node::Index { object, index } => write!(f, "([ {object} {index})"),
            Node::Call { callee, args } => {
                write!(f, "(call {callee}")?;
                write_all(f, args)?;
                f.write_str(")")
            }
            Node::Array { items } => {
                f.write_str("(array")?;
                write_all(f, items)?;
                f.write_str(")")
            }
            Node::Function { name, params, body } => {
                f.write_str("(function")?;
                if let Some(name) = name {
                    write!(f, " {name}")?;
                }
                write!(f, " ({})", params.join(" "))?;
                write_all(f, body)?;
                f.write_str(")")
            }
            Node::Block { body } => {
                f.write_str("(block")?;
                write_all(f, body)?;
                f.write_str(")")
            }
            Node::Var { declarations } => {
                f.write_str("(var")?;
                for d in declarations {
                    match &d.init {
                        Some(init) => write!(f, " ({} {init})", d.name)?,
                        None => write!(f, " {}", d.name)?,
                    }
                }
                f.write_str(")")
            }
            Node::If {
                condition,
                then,
                otherwise,
            } => {
                write!(f, "(if {condition} {then}")?;
                if let Some(otherwise) = otherwise {
                    write!(f, " {otherwise}")?;
                }
                f.write_str(")")
            }
            Node::While { condition, body } => write!(f, "(while {condition} {body})"),
            Node::Return { value: Some(value) } => write!(f, "(return {value})"),
            Node::Return { value: None } => f.write_str("(return)"),
            Node::Break => f.write_str("(break)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn literal(symbol_kind: Option<TokenKind>, value: &str) -> Node {
        let mut s: Symbol<Node> = Symbol::new("(literal)", 0);
        s.arity = Arity::Literal;
        s.kind = symbol_kind;
        s.value = Some(value.into());
        Node::leaf(s)
    }

    #[test]
    fn test_leaf_literal_kinds() {
        assert!(matches!(
            literal(Some(TokenKind::String), "a"),
            Node::Literal { kind: LiteralKind::String, .. }
        ));
        assert!(matches!(
            literal(Some(TokenKind::Regex), "/a/"),
            Node::Literal { kind: LiteralKind::Regex, .. }
        ));
        assert!(matches!(
            literal(Some(TokenKind::Name), "false"),
            Node::Literal { kind: LiteralKind::Boolean, .. }
        ));
        assert!(matches!(
            literal(Some(TokenKind::Name), "null"),
            Node::Literal { kind: LiteralKind::Null, .. }
        ));
    }

    #[test]
    fn test_leaf_name_carries_reservation() {
        let mut s: Symbol<Node> = Symbol::new("(name)", 0);
        s.arity = Arity::Name;
        s.value = Some("x".into());
        s.reserved = true;
        assert_eq!(
            Node::leaf(s),
            Node::Name {
                name: "x".into(),
                declared: true
            }
        );
    }

    #[test]
    fn test_display_nested() {
        let node = Node::Call {
            callee: Box::new(Node::Member {
                object: Box::new(Node::name("console")),
                property: "log".into(),
            }),
            args: vec![
                Node::Literal {
                    kind: LiteralKind::String,
                    value: "hi".into(),
                },
                Node::number("1"),
            ],
        };
        assert_eq!(node.to_string(), r#"(call (. console log) "hi" 1)"#);
    }

    #[test]
    fn test_display_statements() {
        let node = Node::If {
            condition: Box::new(Node::name("a")),
            then: Box::new(Node::Return { value: None }),
            otherwise: Some(Box::new(Node::Break)),
        };
        assert_eq!(node.to_string(), "(if a (return) (break))");

        let node = Node::Function {
            name: None,
            params: vec![],
            body: vec![],
        };
        assert_eq!(node.to_string(), "(function ())");
    }

    #[test]
    fn test_assignable() {
        assert!(Node::name("a").is_assignable());
        assert!(!Node::number("1").is_assignable());
    }
}
