//! Lexical scopes for identifier resolution.
//!
//! Frames are kept in a stack owned by the parser: the frame at index `i`
//! has the frame at `i - 1` as its parent, and the root frame never pops.

use crate::symbol::{Symbol, NAME};
use crate::table::SymbolTable;
use crate::ParseError;
use std::collections::HashMap;
use tracing::trace;

struct Frame<N> {
    bindings: HashMap<String, Symbol<N>>,
}

impl<N> Frame<N> {
    fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

/// A chain of lexical binding frames, innermost last.
pub struct Scope<N> {
    frames: Vec<Frame<N>>,
}

impl<N> Default for Scope<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Scope<N> {
    /// A chain holding only the root frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new()],
        }
    }

    /// Number of frames, root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open a child frame of the current one.
    pub fn push(&mut self) {
        self.frames.push(Frame::new());
        trace!(depth = self.frames.len(), "scope push");
    }

    /// Close the current frame. Popping the root is an error.
    pub fn pop(&mut self) -> Result<(), ParseError> {
        if self.frames.len() <= 1 {
            return Err(ParseError::ScopeUnderflow);
        }
        self.frames.pop();
        trace!(depth = self.frames.len(), "scope pop");
        Ok(())
    }

    /// Drop frames until `depth` remain. The root always survives.
    pub(crate) fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth.max(1));
    }

    /// Bind `symbol` in the current frame under its text.
    ///
    /// Re-declaring a name already bound in this frame keeps the first
    /// binding. Shadowing a binding of an outer frame is allowed.
    pub fn reserve(&mut self, symbol: &Symbol<N>) {
        let name = symbol.text().to_string();
        let Some(frame) = self.frames.last_mut() else {
            return;
        };
        frame.bindings.entry(name).or_insert_with(|| {
            let mut binding = symbol.clone();
            binding.reserved = true;
            binding
        });
    }

    /// Whether `name` is bound in the current frame itself.
    pub fn is_reserved_here(&self, name: &str) -> bool {
        self.frames
            .last()
            .is_some_and(|frame| frame.bindings.contains_key(name))
    }

    /// The nearest enclosing binding for `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&Symbol<N>> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(name))
    }

    /// Resolve `name` to a fresh occurrence.
    ///
    /// Walks from the innermost frame outward. Unbound names fall back to the
    /// table: an exact entry (keyword, constant, word operator) if there is
    /// one, otherwise the generic `(name)` template. Unbound names are free
    /// variables, not errors.
    pub fn find(&self, name: &str, table: &SymbolTable<N>) -> Symbol<N> {
        if let Some(bound) = self.lookup(name) {
            return bound.clone();
        }
        table
            .instantiate(name)
            .unwrap_or_else(|| table.carrier(NAME))
    }
}
