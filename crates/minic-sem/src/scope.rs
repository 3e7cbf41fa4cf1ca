//! Lexically scoped symbol tables.
//!
//! A stack of "ribs": each rib owns its own bindings and holds a
//! lookup-only back-reference to its parent. Ribs are allocated into an
//! `IndexVec` rather than freed individually, so the scope tree never
//! actually shares or re-parents a rib once pushed — exiting a scope just
//! moves `current` back to its parent and the exited rib's bindings become
//! unreachable.

use minic_par::Ty;
use minic_util::{define_idx, FxHashMap, Idx, IndexVec, Symbol};

#[cfg(test)]
use minic_util::Interner;

define_idx!(RibId);

struct Rib {
    bindings: FxHashMap<Symbol, Ty>,
    parent: Option<RibId>,
}

pub struct ScopeTree {
    ribs: IndexVec<RibId, Rib>,
    current: RibId,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        let mut ribs = IndexVec::new();
        let root = ribs.push(Rib { bindings: FxHashMap::default(), parent: None });
        Self { ribs, current: root }
    }

    pub fn enter_scope(&mut self) {
        let rib = self.ribs.push(Rib { bindings: FxHashMap::default(), parent: Some(self.current) });
        self.current = rib;
    }

    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.ribs[self.current].parent {
            self.current = parent;
        }
    }

    /// True if `name` is already bound in the *current* scope only —
    /// shadowing an enclosing scope's binding is allowed.
    pub fn declared_in_current_scope(&self, name: Symbol) -> bool {
        self.ribs[self.current].bindings.contains_key(&name)
    }

    pub fn declare(&mut self, name: Symbol, ty: Ty) {
        self.ribs[self.current].bindings.insert(name, ty);
    }

    /// Walk from the current scope up through parents, returning the
    /// nearest binding's type.
    pub fn resolve(&self, name: Symbol) -> Option<Ty> {
        let mut rib_id = self.current;
        loop {
            let rib = &self.ribs[rib_id];
            if let Some(&ty) = rib.bindings.get(&name) {
                return Some(ty);
            }
            rib_id = rib.parent?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_scope_can_shadow_outer_binding() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut tree = ScopeTree::new();
        tree.declare(x, Ty::Int);
        tree.enter_scope();
        assert!(!tree.declared_in_current_scope(x));
        tree.declare(x, Ty::Bool);
        assert_eq!(tree.resolve(x), Some(Ty::Bool));
        tree.exit_scope();
        assert_eq!(tree.resolve(x), Some(Ty::Int));
    }

    #[test]
    fn redeclaration_in_same_scope_is_detected() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut tree = ScopeTree::new();
        tree.declare(x, Ty::Int);
        assert!(tree.declared_in_current_scope(x));
    }

    #[test]
    fn exited_scope_bindings_are_unreachable() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut tree = ScopeTree::new();
        tree.enter_scope();
        tree.declare(x, Ty::Int);
        tree.exit_scope();
        assert_eq!(tree.resolve(x), None);
    }
}
