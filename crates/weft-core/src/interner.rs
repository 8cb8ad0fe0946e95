//! Terminal-name interning.
//!
//! A grammar interns every terminal name it mentions; a parse session looks
//! up each token's name once, so matching compares [`Symbol`]s.

use std::collections::HashMap;
use std::ops::Index;
use std::sync::Arc;

/// Handle to an interned terminal name, ordered by first interning.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Symbol(u32);

impl Symbol {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct Interner {
    names: Vec<Arc<str>>,
    lookup: HashMap<Arc<str>, Symbol>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&sym) = self.lookup.get(name) {
            return sym;
        }
        let sym = Symbol(self.names.len() as u32);
        let name: Arc<str> = Arc::from(name);
        self.names.push(Arc::clone(&name));
        self.lookup.insert(name, sym);
        sym
    }

    /// Symbol of an already interned name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.lookup.get(name).copied()
    }

    /// Name behind `sym`; `None` for a symbol from another interner.
    #[inline]
    pub fn name(&self, sym: Symbol) -> Option<&str> {
        self.names.get(sym.index()).map(|name| &**name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (Symbol(i as u32), &**name))
    }
}

/// Panics on a symbol from another interner.
impl Index<Symbol> for Interner {
    type Output = str;

    fn index(&self, sym: Symbol) -> &str {
        &self.names[sym.index()]
    }
}
