//! The precedence-climbing parser.
//!
//! One `Parser` per parse. It owns the raw token stream, a cursor into it,
//! the current materialized symbol and the scope chain; the symbol table is
//! shared read-only with every other parser of the same language.

use crate::node::TreeNode;
use crate::registry::{Grammar, GrammarRegistry};
use crate::scope::Scope;
use crate::symbol::{
    Arity, Led, Nud, Symbol, END, LINE_BREAK, LITERAL, PREFIX_BINDING_POWER,
};
use crate::table::SymbolTable;
use crate::ParseError;
use std::sync::Arc;
use tdop_lexer::{RawToken, Scanner, TokenKind};
use tracing::{debug, trace};

/// Top-down operator precedence parser over a raw token stream.
pub struct Parser<N> {
    tokens: Vec<RawToken>,
    pos: usize,
    token: Symbol<N>,
    started: bool,
    scope: Scope<N>,
    table: Arc<SymbolTable<N>>,
}

impl<N: TreeNode> Parser<N> {
    /// Create a parser over `tokens` with an already-built table.
    pub fn new(table: Arc<SymbolTable<N>>, tokens: Vec<RawToken>) -> Self {
        let token = table.carrier(END);
        Self {
            tokens,
            pos: 0,
            token,
            started: false,
            scope: Scope::new(),
            table,
        }
    }

    /// Create a parser for `grammar`, building its table in the global
    /// registry on first use.
    pub fn for_grammar<G>(grammar: &G, tokens: Vec<RawToken>) -> Result<Self, ParseError>
    where
        G: Grammar<Node = N>,
    {
        let table = GrammarRegistry::global().table(grammar)?;
        Ok(Self::new(table, tokens))
    }

    /// Tokenize `source` with the reference scanner and parse every statement.
    pub fn parse_source<G>(grammar: &G, source: &str) -> Result<Vec<N>, ParseError>
    where
        G: Grammar<Node = N>,
    {
        let tokens = Scanner::tokenize(source)?;
        let mut parser = Self::for_grammar(grammar, tokens)?;
        parser.parse()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current symbol.
    pub fn token(&self) -> &Symbol<N> {
        &self.token
    }

    pub fn scope(&self) -> &Scope<N> {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope<N> {
        &mut self.scope
    }

    pub fn table(&self) -> &SymbolTable<N> {
        &self.table
    }

    /// Index of the next raw token to materialize.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// A [`ParseError::Syntax`] located at the current symbol.
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        self.token.error(message)
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Parse every statement up to the end of input.
    pub fn parse(&mut self) -> Result<Vec<N>, ParseError> {
        self.statements(&[])
    }

    /// Parse a single expression that must span the whole input.
    pub fn parse_expression(&mut self) -> Result<N, ParseError> {
        self.start()?;
        let expression = self.expression(0)?;
        self.advance(Some(END))?;
        Ok(expression)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Parse statements until the current symbol is one of `terminators` or
    /// `(end)`. The terminator itself is left unconsumed.
    pub fn statements(&mut self, terminators: &[&str]) -> Result<Vec<N>, ParseError> {
        self.start()?;

        let mut statements = Vec::new();
        while !self.token.is_end() && !terminators.contains(&self.token.id.as_str()) {
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    /// Parse one statement.
    ///
    /// A symbol with a statement denotation is consumed, reserved in the
    /// active scope and handed to that denotation. Anything else is an
    /// expression statement followed by any number of `;` or line breaks.
    pub fn statement(&mut self) -> Result<N, ParseError> {
        self.start()?;

        if let Some(denotation) = self.token.std {
            let mut symbol = self.take()?;
            self.scope.reserve(&symbol);
            symbol.arity = Arity::Statement;
            trace!(id = %symbol.id, line = symbol.line, "statement");
            return denotation(self, symbol);
        }

        let expression = self.expression(0)?;
        while self.token.is(";") || self.token.is_line_break() {
            let id = self.token.id.clone();
            self.advance(Some(&id))?;
        }
        Ok(expression)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Parse an expression whose operators all bind tighter than `rbp`.
    pub fn expression(&mut self, rbp: u32) -> Result<N, ParseError> {
        self.start()?;
        self.skip_line_breaks()?;

        let symbol = self.take()?;
        let mut left = self.null_denotation(symbol)?;

        while rbp < self.token.lbp {
            let symbol = self.take()?;
            left = self.left_denotation(symbol, left)?;
        }
        Ok(left)
    }

    fn null_denotation(&mut self, mut symbol: Symbol<N>) -> Result<N, ParseError> {
        match symbol.nud {
            Some(Nud::Itself) => Ok(N::leaf(symbol)),
            Some(Nud::Prefix) => {
                let operand = self.expression(PREFIX_BINDING_POWER)?;
                Ok(N::unary(symbol, operand))
            }
            Some(Nud::Constant) => {
                self.scope.reserve(&symbol);
                symbol.arity = Arity::Literal;
                symbol.value = symbol.constant.clone();
                Ok(N::leaf(symbol))
            }
            Some(Nud::Custom(nud)) => nud(self, symbol),
            None => Err(ParseError::MissingNullDenotation {
                id: symbol.id,
                line: symbol.line,
                char_pos: symbol.char_pos,
            }),
        }
    }

    fn left_denotation(&mut self, symbol: Symbol<N>, left: N) -> Result<N, ParseError> {
        match symbol.led {
            Some(Led::Infix) => {
                let right = self.expression(symbol.lbp)?;
                Ok(N::binary(symbol, left, right))
            }
            Some(Led::InfixRight) => {
                let right = self.expression(symbol.lbp.saturating_sub(1))?;
                Ok(N::binary(symbol, left, right))
            }
            Some(Led::Custom(led)) => led(self, symbol, left),
            None => Err(symbol.error(format!("'{}' cannot continue an expression", symbol.id))),
        }
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    /// Move to the next symbol, skipping line breaks.
    ///
    /// With `expected`, the current symbol must have that id first; otherwise
    /// this fails with [`ParseError::UnexpectedToken`].
    pub fn advance(&mut self, expected: Option<&str>) -> Result<(), ParseError> {
        if let Some(id) = expected {
            if !self.peek(id)? {
                return Err(ParseError::UnexpectedToken {
                    expected: id.to_string(),
                    found: self.token.id.clone(),
                    line: self.token.line,
                    char_pos: self.token.char_pos,
                });
            }
        }

        self.token = self.next_symbol()?;
        self.skip_line_breaks()
    }

    /// Shorthand for `advance(Some(id))`.
    pub fn expect(&mut self, id: &str) -> Result<(), ParseError> {
        self.advance(Some(id))
    }

    /// Whether the current symbol has id `id`, without consuming it.
    ///
    /// Pending line breaks are skipped first unless `id` asks for one.
    pub fn peek(&mut self, id: &str) -> Result<bool, ParseError> {
        if id != LINE_BREAK {
            self.skip_line_breaks()?;
        }
        Ok(self.token.id == id)
    }

    /// Open a child scope.
    pub fn new_scope(&mut self) {
        self.scope.push();
    }

    /// Close the current scope. Popping the root scope is an error.
    pub fn scope_pop(&mut self) -> Result<(), ParseError> {
        self.scope.pop()
    }

    /// Run `f` inside a fresh child scope. The scope chain is restored to its
    /// prior depth whether `f` succeeds or fails.
    ///
    /// Advancing materializes the following token, so a construct's closing
    /// token should be consumed after this returns: otherwise a name right
    /// behind it resolves against the child scope.
    pub fn with_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let depth = self.scope.depth();
        self.new_scope();
        let result = f(self);
        self.scope.truncate(depth);
        result
    }

    /// Materialize the next raw token as a symbol occurrence.
    ///
    /// Names resolve through the scope chain, literals clone the `(literal)`
    /// carrier, comments are skipped and everything else is looked up by its
    /// exact text. Past the last token this yields `(end)` forever.
    pub fn next_symbol(&mut self) -> Result<Symbol<N>, ParseError> {
        while let Some(raw) = self.tokens.get(self.pos) {
            self.pos += 1;

            let (mut symbol, arity) = match raw.kind {
                TokenKind::Comment => continue,
                TokenKind::Name => (self.scope.find(&raw.value, &self.table), Arity::Name),
                kind if kind.is_literal() => (self.table.carrier(LITERAL), Arity::Literal),
                TokenKind::LineBreak => (self.table.carrier(LINE_BREAK), Arity::Operator),
                _ => match self.table.instantiate(&raw.value) {
                    Some(symbol) => (symbol, Arity::Operator),
                    None => {
                        return Err(ParseError::UnknownOperator {
                            text: raw.value.clone(),
                            arity: raw.kind,
                            line: raw.line,
                            char_pos: raw.char_pos,
                        })
                    }
                },
            };

            symbol.arity = arity;
            symbol.kind = Some(raw.kind);
            symbol.value = Some(raw.value.clone());
            symbol.line = raw.line;
            symbol.char_pos = raw.char_pos;
            trace!(id = %symbol.id, value = %raw.value, line = raw.line, "token");
            return Ok(symbol);
        }

        let mut end = self.table.carrier(END);
        if let Some(last) = self.tokens.last() {
            end.line = last.line;
            end.char_pos = last.char_pos + last.value.chars().count();
        }
        Ok(end)
    }

    /// Prime the cursor on first use.
    fn start(&mut self) -> Result<(), ParseError> {
        if !self.started {
            self.started = true;
            debug!(tokens = self.tokens.len(), "parse start");
            self.token = self.next_symbol()?;
            self.skip_line_breaks()?;
        }
        Ok(())
    }

    /// Return the current symbol and move past it.
    fn take(&mut self) -> Result<Symbol<N>, ParseError> {
        let next = self.next_symbol()?;
        let current = std::mem::replace(&mut self.token, next);
        self.skip_line_breaks()?;
        Ok(current)
    }

    fn skip_line_breaks(&mut self) -> Result<(), ParseError> {
        while self.token.is_line_break() {
            self.token = self.next_symbol()?;
        }
        Ok(())
    }
}
