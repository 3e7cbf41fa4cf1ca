//! Three-address code: operands and instructions.
//!
//! The source's operand representation is an untyped string that conflates
//! literals with names (a "temp" is just a string starting with `t` then
//! digits). Here operands are a tagged variant instead, so "is this a
//! temp" and "is this the same value" are pattern matches, not string
//! parsing — textual form is only reconstructed at `--show-ir` and at
//! assembly emission.

use minic_par::{BinOp, UnOp};
use minic_util::{define_idx, Idx, Interner, Symbol};
use std::fmt;

define_idx!(TempId);
define_idx!(LabelId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Temp(TempId),
    Var(Symbol),
    IntLit(i64),
    BoolLit(bool),
}

impl Operand {
    pub fn as_const_int(&self) -> Option<i64> {
        match self {
            Operand::IntLit(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_const_bool(&self) -> Option<bool> {
        match self {
            Operand::BoolLit(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_temp(&self) -> bool {
        matches!(self, Operand::Temp(_))
    }

    pub fn render(&self, interner: &Interner) -> String {
        match self {
            Operand::Temp(id) => format!("t{}", id.index()),
            Operand::Var(sym) => interner.as_str(*sym).to_string(),
            Operand::IntLit(v) => v.to_string(),
            Operand::BoolLit(b) => b.to_string(),
        }
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.index())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    Int,
    Bool,
}

impl From<minic_par::Ty> for Ty {
    fn from(ty: minic_par::Ty) -> Self {
        match ty {
            minic_par::Ty::Int => Ty::Int,
            minic_par::Ty::Bool => Ty::Bool,
        }
    }
}

/// One instruction of the flat, linear three-address-code program. There
/// is no basic-block structure: `Label`/`Goto`/`IfFalse` encode control
/// flow directly as jumps over a flat instruction vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TacInstr {
    VarDecl { ty: Ty, name: Symbol },
    Assign { dest: Operand, src: Operand },
    BinOp { dest: Operand, left: Operand, op: BinOp, right: Operand },
    UnOp { dest: Operand, op: UnOp, operand: Operand },
    Label { label: LabelId },
    Goto { label: LabelId },
    IfFalse { cond: Operand, label: LabelId },
    Print { value: Operand },
}

impl TacInstr {
    /// The instruction's assigned destination, if it has one that can be
    /// folded or propagated.
    pub fn dest(&self) -> Option<Operand> {
        match self {
            TacInstr::Assign { dest, .. }
            | TacInstr::BinOp { dest, .. }
            | TacInstr::UnOp { dest, .. } => Some(*dest),
            _ => None,
        }
    }

    pub fn render(&self, interner: &Interner) -> String {
        let r = |op: &Operand| op.render(interner);
        match self {
            TacInstr::VarDecl { ty, name } => {
                let ty = match ty {
                    Ty::Int => "int",
                    Ty::Bool => "bool",
                };
                format!("vardecl {ty} {}", interner.as_str(*name))
            }
            TacInstr::Assign { dest, src } => format!("{} = {}", r(dest), r(src)),
            TacInstr::BinOp { dest, left, op, right } => {
                format!("{} = {} {} {}", r(dest), r(left), binop_symbol(*op), r(right))
            }
            TacInstr::UnOp { dest, op, operand } => {
                format!("{} = {}{}", r(dest), unop_symbol(*op), r(operand))
            }
            TacInstr::Label { label } => format!("{label}:"),
            TacInstr::Goto { label } => format!("goto {label}"),
            TacInstr::IfFalse { cond, label } => format!("iffalse {} goto {label}", r(cond)),
            TacInstr::Print { value } => format!("print {}", r(value)),
        }
    }
}

fn binop_symbol(op: BinOp) -> &'static str {
    use BinOp::*;
    match op {
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Mod => "%",
        Lt => "<",
        Gt => ">",
        Le => "<=",
        Ge => ">=",
        Eq => "==",
        Ne => "!=",
        And => "&&",
        Or => "||",
    }
}

fn unop_symbol(op: UnOp) -> &'static str {
    match op {
        UnOp::Neg => "-",
        UnOp::Not => "!",
    }
}
