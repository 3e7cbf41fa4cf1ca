//! AST → TAC lowering.
//!
//! Fresh-name counters (`next_temp`, `next_label`) are instance fields on
//! a short-lived `Lowering` value, not process-wide state — each
//! compilation gets its own, discarded when lowering finishes.

use crate::tac::{LabelId, Operand, TacInstr, TempId};
use minic_par::{Expr, Program, Stmt};
use minic_util::Idx;

pub fn lower(program: &Program) -> Vec<TacInstr> {
    let mut lowering = Lowering { instrs: Vec::new(), next_temp: 0, next_label: 0 };
    for stmt in &program.stmts {
        lowering.lower_stmt(stmt);
    }
    lowering.instrs
}

struct Lowering {
    instrs: Vec<TacInstr>,
    next_temp: u32,
    next_label: u32,
}

impl Lowering {
    fn fresh_temp(&mut self) -> Operand {
        let id = TempId::from_usize(self.next_temp as usize);
        self.next_temp += 1;
        Operand::Temp(id)
    }

    fn fresh_label(&mut self) -> LabelId {
        let id = LabelId::from_usize(self.next_label as usize);
        self.next_label += 1;
        id
    }

    fn lower_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl { ty, name, .. } => {
                self.instrs.push(TacInstr::VarDecl { ty: (*ty).into(), name: *name });
            }
            Stmt::Assign { name, expr, .. } => {
                let src = self.lower_expr(expr);
                self.instrs.push(TacInstr::Assign { dest: Operand::Var(*name), src });
            }
            Stmt::If { cond, then_stmts, else_stmts, .. } => {
                let cv = self.lower_expr(cond);
                let l_else = self.fresh_label();
                let l_end = self.fresh_label();
                self.instrs.push(TacInstr::IfFalse { cond: cv, label: l_else });
                for s in then_stmts {
                    self.lower_stmt(s);
                }
                self.instrs.push(TacInstr::Goto { label: l_end });
                self.instrs.push(TacInstr::Label { label: l_else });
                for s in else_stmts {
                    self.lower_stmt(s);
                }
                self.instrs.push(TacInstr::Label { label: l_end });
            }
            Stmt::While { cond, body, .. } => {
                let l_start = self.fresh_label();
                let l_end = self.fresh_label();
                self.instrs.push(TacInstr::Label { label: l_start });
                let cv = self.lower_expr(cond);
                self.instrs.push(TacInstr::IfFalse { cond: cv, label: l_end });
                for s in body {
                    self.lower_stmt(s);
                }
                self.instrs.push(TacInstr::Goto { label: l_start });
                self.instrs.push(TacInstr::Label { label: l_end });
            }
            Stmt::Print { expr, .. } => {
                let value = self.lower_expr(expr);
                self.instrs.push(TacInstr::Print { value });
            }
            Stmt::Block { stmts, .. } => {
                for s in stmts {
                    self.lower_stmt(s);
                }
            }
        }
    }

    fn lower_expr(&mut self, expr: &Expr) -> Operand {
        match expr {
            Expr::IntLiteral { value, .. } => Operand::IntLit(*value),
            Expr::BoolLiteral { value, .. } => Operand::BoolLit(*value),
            Expr::Identifier { name, .. } => Operand::Var(*name),
            Expr::BinaryOp { op, left, right, .. } => {
                let lv = self.lower_expr(left);
                let rv = self.lower_expr(right);
                let dest = self.fresh_temp();
                self.instrs.push(TacInstr::BinOp { dest, left: lv, op: *op, right: rv });
                dest
            }
            Expr::UnaryOp { op, operand, .. } => {
                let ev = self.lower_expr(operand);
                let dest = self.fresh_temp();
                self.instrs.push(TacInstr::UnOp { dest, op: *op, operand: ev });
                dest
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minic_util::Interner;

    fn lower_src(src: &str) -> Vec<TacInstr> {
        let mut interner = Interner::new();
        let tokens = minic_lex::lex(src, &mut interner).unwrap();
        let program = minic_par::parse(&tokens).unwrap();
        lower(&program)
    }

    #[test]
    fn assign_of_a_binop_emits_one_binop_then_one_assign() {
        let instrs = lower_src("int x; x = 1 + 2;");
        assert!(matches!(instrs[0], TacInstr::VarDecl { .. }));
        assert!(matches!(instrs[1], TacInstr::BinOp { .. }));
        assert!(matches!(instrs[2], TacInstr::Assign { .. }));
    }

    #[test]
    fn if_without_else_still_emits_both_labels() {
        let instrs = lower_src("int x; x = 1; if (x < 5) { print(x); }");
        let labels: Vec<_> =
            instrs.iter().filter(|i| matches!(i, TacInstr::Label { .. })).collect();
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn while_loop_jumps_back_to_its_condition_label() {
        let instrs = lower_src("int x; x = 1; while (x < 10) { x = x * 2; }");
        assert!(matches!(instrs.last(), Some(TacInstr::Label { .. })));
        let goto_count = instrs.iter().filter(|i| matches!(i, TacInstr::Goto { .. })).count();
        assert_eq!(goto_count, 1);
    }
}
