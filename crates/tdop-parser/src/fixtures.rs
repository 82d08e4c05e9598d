//! A small calculator grammar shared by the unit tests.

use crate::symbol::Arity;
use crate::{Grammar, ParseError, Parser, Symbol, SymbolTable, TreeNode};
use std::fmt;
use tdop_lexer::{RawToken, Scanner};

#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    /// A name and whether it resolved to a scope binding.
    Name(String, bool),
    Leaf(String),
    Unary(String, Box<Tree>),
    Binary(String, Box<Tree>, Box<Tree>),
    Block(String, Vec<Tree>),
}

impl TreeNode for Tree {
    fn leaf(symbol: Symbol<Self>) -> Self {
        match symbol.arity {
            Arity::Name => Tree::Name(symbol.text().to_string(), symbol.reserved),
            _ => Tree::Leaf(symbol.text().to_string()),
        }
    }

    fn unary(symbol: Symbol<Self>, operand: Self) -> Self {
        Tree::Unary(symbol.id, Box::new(operand))
    }

    fn binary(symbol: Symbol<Self>, left: Self, right: Self) -> Self {
        Tree::Binary(symbol.id, Box::new(left), Box::new(right))
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Name(text, _) | Tree::Leaf(text) => f.write_str(text),
            Tree::Unary(op, operand) => write!(f, "({op} {operand})"),
            Tree::Binary(op, left, right) => write!(f, "({op} {left} {right})"),
            Tree::Block(keyword, items) => {
                write!(f, "({keyword}")?;
                for item in items {
                    write!(f, " {item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

pub struct Calc;

impl Grammar for Calc {
    type Node = Tree;

    fn language(&self) -> &str {
        "calc"
    }

    fn build(&self, t: &mut SymbolTable<Tree>) -> Result<(), ParseError> {
        for id in [";", ")", "}"] {
            t.symbol(id, 0);
        }
        t.define_constant("pi", "3.14159");

        t.define_operator(",", 5);
        t.define_operator_right_assoc("=", 10);
        t.define_operator("+", 50);
        t.define_operator("-", 50);
        t.define_operator("*", 60);
        t.define_operator("/", 60);
        t.define_operator_right_assoc("**", 70);

        t.define_prefix("-");
        t.define_prefix_with("(", group);

        t.define_statement("{", block);
        t.define_statement("let", let_statement);
        Ok(())
    }
}

fn group(p: &mut Parser<Tree>, _: Symbol<Tree>) -> Result<Tree, ParseError> {
    let inner = p.expression(0)?;
    p.expect(")")?;
    Ok(inner)
}

fn block(p: &mut Parser<Tree>, _: Symbol<Tree>) -> Result<Tree, ParseError> {
    let body = p.with_scope(|p| p.statements(&["}"]))?;
    p.expect("}")?;
    Ok(Tree::Block("{".into(), body))
}

fn let_statement(p: &mut Parser<Tree>, _: Symbol<Tree>) -> Result<Tree, ParseError> {
    let name = p.token().clone();
    if name.arity != Arity::Name {
        return Err(name.error("expected a name"));
    }
    p.scope_mut().reserve(&name);
    p.advance(None)?;
    p.expect("=")?;
    let value = p.expression(0)?;
    if p.peek(";")? {
        p.advance(None)?;
    }
    Ok(Tree::Block(
        "let".into(),
        vec![Tree::Name(name.text().to_string(), true), value],
    ))
}

pub fn tokens(source: &str) -> Vec<RawToken> {
    Scanner::tokenize(source).unwrap()
}

pub fn sexpr(trees: &[Tree]) -> Vec<String> {
    trees.iter().map(ToString::to_string).collect()
}
