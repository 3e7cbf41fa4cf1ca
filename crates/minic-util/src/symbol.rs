//! String interning.
//!
//! Identifiers are compared and hashed constantly across the semantic
//! analyzer, the IR generator, and the code generator's stack layout. A
//! `Symbol` is a 4-byte handle into an [`Interner`]'s storage, so those
//! comparisons become integer comparisons instead of string comparisons.
//!
//! Unlike a process-global interner, an [`Interner`] is owned by one
//! compilation [`Session`](../../minic_drv/struct.Session.html): it is built
//! fresh at the start of a compile and dropped at the end, matching the rule
//! that no phase caches results across compilations. Each interned string is
//! its own heap allocation (`Box<str>`) rather than a slice of a shared
//! arena, so `as_str` can simply borrow from `self` with no unsafe lifetime
//! extension involved.

use rustc_hash::FxHashMap;
use std::fmt;

/// An interned identifier: a 4-byte handle into an [`Interner`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Owns the backing storage for every [`Symbol`] produced during one
/// compilation.
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Symbol>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        Self { strings: Vec::new(), lookup: FxHashMap::default() }
    }

    /// Intern `text`, returning the existing symbol if it was already seen.
    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(&sym) = self.lookup.get(text) {
            return sym;
        }

        let boxed: Box<str> = text.into();
        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, sym);
        sym
    }

    pub fn as_str(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_interns_to_the_same_symbol() {
        let mut interner = Interner::new();
        let a = interner.intern("x");
        let b = interner.intern("x");
        let c = interner.intern("y");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn as_str_recovers_original_text() {
        let mut interner = Interner::new();
        let sym = interner.intern("counter");
        assert_eq!(interner.as_str(sym), "counter");
    }
}
