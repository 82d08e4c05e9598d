//! Symbol table and the grammar registration DSL.
//!
//! A table is filled once by [`Grammar::build`](crate::Grammar::build) and is
//! read-only afterwards: parsers hold it behind an `Arc` and only ever clone
//! entries out of it.

use crate::symbol::{
    Led, LedFn, Nud, NudFn, StdFn, Symbol, ASSIGNMENT_BINDING_POWER, END, LINE_BREAK, LITERAL,
    NAME,
};
use crate::ParseError;
use std::collections::HashMap;
use tracing::trace;

/// Mapping from symbol id to its canonical template.
pub struct SymbolTable<N> {
    symbols: HashMap<String, Symbol<N>>,
}

impl<N> Default for SymbolTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> SymbolTable<N> {
    /// Create a table holding only the grammar-independent carriers:
    /// `(end)`, `(name)`, `(literal)` and `(newline)`.
    pub fn new() -> Self {
        let mut table = Self {
            symbols: HashMap::new(),
        };
        table.symbol(END, 0);
        table.symbol(LINE_BREAK, 0);
        table.define_identity(NAME);
        table.define_identity(LITERAL);
        table
    }

    pub fn get(&self, id: &str) -> Option<&Symbol<N>> {
        self.symbols.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.symbols.contains_key(id)
    }

    /// A fresh occurrence cloned from the template registered under `id`.
    pub fn instantiate(&self, id: &str) -> Option<Symbol<N>> {
        self.symbols.get(id).cloned()
    }

    /// A fresh occurrence of one of the built-in carriers.
    pub(crate) fn carrier(&self, id: &str) -> Symbol<N> {
        self.instantiate(id).unwrap_or_else(|| {
            let mut symbol = Symbol::new(id, 0);
            if id == NAME || id == LITERAL {
                symbol.nud = Some(Nud::Itself);
            }
            symbol
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    // =========================================================================
    // Registration DSL
    // =========================================================================

    /// Get or create the entry for `id`. An existing entry's binding power is
    /// raised to `bp` if `bp` is larger; it is never lowered.
    pub fn symbol(&mut self, id: &str, bp: u32) -> &mut Symbol<N> {
        let symbol = self
            .symbols
            .entry(id.to_string())
            .or_insert_with(|| Symbol::new(id, bp));
        symbol.lbp = symbol.lbp.max(bp);
        symbol
    }

    /// Left-associative infix operator with the default binary left
    /// denotation.
    pub fn define_operator(&mut self, id: &str, bp: u32) -> &mut Symbol<N> {
        self.register_led(id, bp, Led::Infix)
    }

    /// Left-associative infix operator with a custom left denotation.
    pub fn define_operator_with(&mut self, id: &str, bp: u32, led: LedFn<N>) -> &mut Symbol<N> {
        self.register_led(id, bp, Led::Custom(led))
    }

    /// Right-associative infix operator: the right operand is parsed at
    /// `bp - 1`, so `a = b = c` nests as `a = (b = c)`.
    pub fn define_operator_right_assoc(&mut self, id: &str, bp: u32) -> &mut Symbol<N> {
        self.register_led(id, bp, Led::InfixRight)
    }

    /// Right-associative infix operator with a custom left denotation.
    pub fn define_operator_right_assoc_with(
        &mut self,
        id: &str,
        bp: u32,
        led: LedFn<N>,
    ) -> &mut Symbol<N> {
        self.register_led(id, bp, Led::Custom(led))
    }

    /// Assignment operator at the conventional binding power of 10. The left
    /// denotation is grammar-supplied since only the grammar knows which left
    /// operands are assignable.
    pub fn define_assignment(&mut self, id: &str, led: LedFn<N>) -> &mut Symbol<N> {
        self.define_operator_right_assoc_with(id, ASSIGNMENT_BINDING_POWER, led)
    }

    /// Prefix operator with the default unary null denotation.
    pub fn define_prefix(&mut self, id: &str) -> &mut Symbol<N> {
        self.register_nud(id, Nud::Prefix)
    }

    /// Prefix symbol with a custom null denotation (grouping, literals with
    /// structure, function expressions).
    pub fn define_prefix_with(&mut self, id: &str, nud: NudFn<N>) -> &mut Symbol<N> {
        self.register_nud(id, Nud::Custom(nud))
    }

    /// Symbol whose null denotation returns the occurrence itself.
    pub fn define_identity(&mut self, id: &str) -> &mut Symbol<N> {
        self.register_nud(id, Nud::Itself)
    }

    /// Name that parses as a literal carrying `value`.
    pub fn define_constant(&mut self, id: &str, value: &str) -> &mut Symbol<N> {
        let symbol = self.register_nud(id, Nud::Constant);
        symbol.constant = Some(value.to_string());
        symbol
    }

    /// Symbol that drives its own parsing when it begins a statement.
    pub fn define_statement(&mut self, id: &str, std: StdFn<N>) -> &mut Symbol<N> {
        trace!(id, "define statement");
        let symbol = self.symbol(id, 0);
        symbol.std = Some(std);
        symbol
    }

    fn register_led(&mut self, id: &str, bp: u32, led: Led<N>) -> &mut Symbol<N> {
        trace!(id, bp, ?led, "define infix");
        let symbol = self.symbol(id, bp);
        symbol.led = Some(led);
        symbol
    }

    fn register_nud(&mut self, id: &str, nud: Nud<N>) -> &mut Symbol<N> {
        trace!(id, ?nud, "define prefix");
        let symbol = self.symbol(id, 0);
        symbol.nud = Some(nud);
        symbol
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check the table after a grammar build.
    ///
    /// A left denotation needs a non-zero binding power to ever fire, a
    /// non-zero binding power needs a left denotation to act on, and a
    /// constant needs a value.
    pub fn validate(&self) -> Result<(), ParseError> {
        let mut ids: Vec<&String> = self.symbols.keys().collect();
        ids.sort();

        for id in ids {
            let symbol = &self.symbols[id];
            if symbol.led.is_some() && symbol.lbp == 0 {
                return Err(ParseError::Configuration(format!(
                    "symbol '{id}' has a left denotation but zero binding power"
                )));
            }
            if symbol.led.is_none() && symbol.lbp > 0 {
                return Err(ParseError::Configuration(format!(
                    "symbol '{id}' has binding power {} but no left denotation",
                    symbol.lbp
                )));
            }
            if matches!(symbol.nud, Some(Nud::Constant)) && symbol.constant.is_none() {
                return Err(ParseError::Configuration(format!(
                    "constant '{id}' has no value"
                )));
            }
        }

        for carrier in [END, NAME, LITERAL, LINE_BREAK] {
            if !self.symbols.contains_key(carrier) {
                return Err(ParseError::Configuration(format!(
                    "built-in symbol '{carrier}' is missing"
                )));
            }
        }

        Ok(())
    }
}
