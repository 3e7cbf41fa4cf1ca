//! Stack frame layout.
//!
//! Every variable and temporary that is ever assigned to gets one 8-byte
//! slot, in sorted-name order starting at `-8(%rbp)`. Sorting by name
//! (rather than by order of first appearance) is what makes codegen
//! deterministic independent of incidental temp-numbering choices made by
//! earlier passes.

use minic_ir::{Operand, TacInstr};
use minic_util::{FxHashMap, Interner};

pub struct StackFrame {
    offsets: FxHashMap<String, i32>,
}

impl StackFrame {
    pub fn layout(instrs: &[TacInstr], interner: &Interner) -> Self {
        let mut names: Vec<String> = Vec::new();

        for instr in instrs {
            match instr {
                TacInstr::VarDecl { name, .. } => names.push(interner.as_str(*name).to_string()),
                TacInstr::Assign { dest, .. }
                | TacInstr::BinOp { dest, .. }
                | TacInstr::UnOp { dest, .. } => names.push(dest.render(interner)),
                _ => {}
            }
        }

        names.sort();
        names.dedup();

        let mut offsets = FxHashMap::default();
        let mut next = -8i32;
        for name in names {
            offsets.insert(name, next);
            next -= 8;
        }

        Self { offsets }
    }

    pub fn slot_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn offset_of(&self, operand: Operand, interner: &Interner) -> i32 {
        let name = operand.render(interner);
        *self
            .offsets
            .get(&name)
            .unwrap_or_else(|| panic!("operand '{name}' has no stack slot"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minic_ir::{TempId, Ty};
    use minic_util::Idx;

    #[test]
    fn slots_are_assigned_in_lexicographic_order() {
        let mut interner = Interner::new();
        let y = interner.intern("y");
        let x = interner.intern("x");
        let instrs = vec![
            TacInstr::VarDecl { ty: Ty::Int, name: y },
            TacInstr::VarDecl { ty: Ty::Int, name: x },
            TacInstr::Assign { dest: Operand::Var(x), src: Operand::IntLit(1) },
            TacInstr::Assign {
                dest: Operand::Temp(TempId::from_usize(0)),
                src: Operand::IntLit(2),
            },
        ];
        let frame = StackFrame::layout(&instrs, &interner);
        assert_eq!(frame.offset_of(Operand::Temp(TempId::from_usize(0)), &interner), -8);
        assert_eq!(frame.offset_of(Operand::Var(x), &interner), -16);
        assert_eq!(frame.offset_of(Operand::Var(y), &interner), -24);
        assert_eq!(frame.slot_count(), 3);
    }
}
