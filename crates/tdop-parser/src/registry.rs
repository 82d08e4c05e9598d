//! Per-language symbol table registry.
//!
//! Each language's table is built once, on first request, and shared by
//! every parser for that language afterwards. Builds are single-flight: the
//! first caller for a language builds while concurrent callers for the same
//! language wait on that language's slot, then reuse the result.

use crate::node::TreeNode;
use crate::table::SymbolTable;
use crate::ParseError;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// A concrete grammar: a language identifier plus the one-time routine that
/// registers its symbols.
pub trait Grammar {
    type Node: TreeNode + 'static;

    /// Key under which the built table is memoized. Must not be empty.
    fn language(&self) -> &str;

    /// Register every symbol of the language.
    fn build(&self, table: &mut SymbolTable<Self::Node>) -> Result<(), ParseError>;
}

type BuiltTable = Arc<dyn Any + Send + Sync>;
type Slot = Arc<Mutex<Option<BuiltTable>>>;

static GLOBAL: OnceLock<GrammarRegistry> = OnceLock::new();

/// Memoized symbol tables keyed by language identifier.
#[derive(Default)]
pub struct GrammarRegistry {
    slots: Mutex<HashMap<String, Slot>>,
}

impl GrammarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static GrammarRegistry {
        GLOBAL.get_or_init(GrammarRegistry::new)
    }

    /// The built table for `grammar`'s language, building it on first use.
    ///
    /// A failed build leaves the slot empty, so the next request retries.
    pub fn table<G: Grammar>(&self, grammar: &G) -> Result<Arc<SymbolTable<G::Node>>, ParseError> {
        let language = grammar.language();
        if language.is_empty() {
            return Err(ParseError::Configuration(
                "grammar has no language identifier".into(),
            ));
        }

        // Hold the map lock only long enough to find the language's slot.
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(language.to_string()).or_default())
        };

        let mut built = slot.lock();
        if let Some(existing) = built.as_ref() {
            debug!(language, "reusing symbol table");
            return Arc::clone(existing)
                .downcast::<SymbolTable<G::Node>>()
                .map_err(|_| {
                    ParseError::Configuration(format!(
                        "language '{language}' is registered with a different node type"
                    ))
                });
        }

        debug!(language, "building symbol table");
        let mut table = SymbolTable::new();
        grammar.build(&mut table)?;
        table.validate()?;
        debug!(language, symbols = table.len(), "symbol table built");

        let table = Arc::new(table);
        *built = Some(Arc::clone(&table) as BuiltTable);
        Ok(table)
    }

    /// Whether a table for `language` has been built.
    pub fn is_built(&self, language: &str) -> bool {
        let Some(slot) = self.slots.lock().get(language).cloned() else {
            return false;
        };
        let built = slot.lock().is_some();
        built
    }

    /// Languages with a built table, sorted.
    pub fn languages(&self) -> Vec<String> {
        let slots: Vec<(String, Slot)> = self
            .slots
            .lock()
            .iter()
            .map(|(language, slot)| (language.clone(), Arc::clone(slot)))
            .collect();
        let mut languages: Vec<String> = slots
            .into_iter()
            .filter(|(_, slot)| slot.lock().is_some())
            .map(|(language, _)| language)
            .collect();
        languages.sort();
        languages
    }
}
