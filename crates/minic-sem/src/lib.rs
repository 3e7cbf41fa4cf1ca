//! minic-sem - Semantic Analyzer & Type Checker
//!
//! ================================================================
//! SEMANTIC ANALYSIS THEORY
//! ================================================================
//!
//! PHASES OF SEMANTIC ANALYSIS (as performed here, single pass):
//!
//! 1. NAME RESOLUTION
//!    Every identifier use must resolve to a declaration visible in the
//!    current scope or an enclosing one. [`scope::ScopeTree`] is a stack of
//!    scopes pushed on block entry and popped on exit, so resolution walks
//!    outward from the innermost scope.
//!
//! 2. TYPE CHECKING
//!    MiniC has exactly two types, `int` and `bool`, with no implicit
//!    conversions between them. Each expression is checked against the
//!    rules in `check_binop`/`check_expr` and either yields a `Ty` or fails
//!    with a [`CompileError::Semantic`] at the offending position.
//!
//! Unlike a general-purpose language, MiniC has no borrowing, no control-
//! flow-sensitive analysis (no `return`, so no reachability to check), and
//! no further miscellaneous lints — the two phases above are the entire
//! pass.
//!
//! Walks the AST once, maintaining a stack of lexical scopes, enforcing
//! redeclaration and declared-use rules, and checking every expression
//! and statement against the type rules below. Fails fast: the first
//! violation found is returned and nothing past it is checked.
//!
//! Nothing downstream (IR generation, optimization, codegen) should ever
//! observe a semantic error — if it does, that is an internal error, not
//! a semantic one.

mod scope;

use minic_par::{BinOp, Expr, Program, Stmt, Ty, UnOp};
use minic_util::{CompileError, CompileResult, Interner, Pos};
use scope::ScopeTree;

pub fn check(program: &Program, interner: &Interner) -> CompileResult<()> {
    Checker { scopes: ScopeTree::new(), interner }.check_program(program)
}

struct Checker<'a> {
    scopes: ScopeTree,
    interner: &'a Interner,
}

impl<'a> Checker<'a> {
    fn check_program(&mut self, program: &Program) -> CompileResult<()> {
        for stmt in &program.stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> CompileResult<()> {
        match stmt {
            Stmt::VarDecl { ty, name, pos } => {
                if self.scopes.declared_in_current_scope(*name) {
                    return Err(self.err(
                        *pos,
                        format!("'{}' is already declared in this scope", self.name(*name)),
                    ));
                }
                self.scopes.declare(*name, *ty);
                Ok(())
            }
            Stmt::Assign { name, expr, pos } => {
                let expr_ty = self.check_expr(expr)?;
                let Some(declared_ty) = self.scopes.resolve(*name) else {
                    return Err(self.err(*pos, format!("undeclared identifier '{}'", self.name(*name))));
                };
                if expr_ty != declared_ty {
                    return Err(self.err(
                        *pos,
                        format!(
                            "cannot assign {} to '{}' of type {}",
                            ty_name(expr_ty),
                            self.name(*name),
                            ty_name(declared_ty)
                        ),
                    ));
                }
                Ok(())
            }
            Stmt::If { cond, then_stmts, else_stmts, pos } => {
                self.require_bool(cond, *pos, "if condition")?;
                self.in_scope(|this| {
                    for s in then_stmts {
                        this.check_stmt(s)?;
                    }
                    Ok(())
                })?;
                self.in_scope(|this| {
                    for s in else_stmts {
                        this.check_stmt(s)?;
                    }
                    Ok(())
                })
            }
            Stmt::While { cond, body, pos } => {
                self.require_bool(cond, *pos, "while condition")?;
                self.in_scope(|this| {
                    for s in body {
                        this.check_stmt(s)?;
                    }
                    Ok(())
                })
            }
            Stmt::Print { expr, .. } => {
                self.check_expr(expr)?;
                Ok(())
            }
            Stmt::Block { stmts, .. } => self.in_scope(|this| {
                for s in stmts {
                    this.check_stmt(s)?;
                }
                Ok(())
            }),
        }
    }

    fn check_expr(&mut self, expr: &Expr) -> CompileResult<Ty> {
        match expr {
            Expr::IntLiteral { .. } => Ok(Ty::Int),
            Expr::BoolLiteral { .. } => Ok(Ty::Bool),
            Expr::Identifier { name, pos } => self
                .scopes
                .resolve(*name)
                .ok_or_else(|| self.err(*pos, format!("undeclared identifier '{}'", self.name(*name)))),
            Expr::UnaryOp { op, operand, pos } => {
                let operand_ty = self.check_expr(operand)?;
                match (op, operand_ty) {
                    (UnOp::Neg, Ty::Int) => Ok(Ty::Int),
                    (UnOp::Not, Ty::Bool) => Ok(Ty::Bool),
                    (UnOp::Neg, Ty::Bool) => {
                        Err(self.err(*pos, "unary '-' requires an int operand"))
                    }
                    (UnOp::Not, Ty::Int) => {
                        Err(self.err(*pos, "unary '!' requires a bool operand"))
                    }
                }
            }
            Expr::BinaryOp { op, left, right, pos } => {
                let lt = self.check_expr(left)?;
                let rt = self.check_expr(right)?;
                self.check_binop(*op, lt, rt, *pos)
            }
        }
    }

    fn check_binop(&self, op: BinOp, lt: Ty, rt: Ty, pos: Pos) -> CompileResult<Ty> {
        use BinOp::*;
        match op {
            Add | Sub | Mul | Div | Mod => {
                self.require(lt == Ty::Int && rt == Ty::Int, pos, op, lt, rt)?;
                Ok(Ty::Int)
            }
            Lt | Gt | Le | Ge => {
                self.require(lt == Ty::Int && rt == Ty::Int, pos, op, lt, rt)?;
                Ok(Ty::Bool)
            }
            Eq | Ne => {
                self.require(lt == rt, pos, op, lt, rt)?;
                Ok(Ty::Bool)
            }
            And | Or => {
                self.require(lt == Ty::Bool && rt == Ty::Bool, pos, op, lt, rt)?;
                Ok(Ty::Bool)
            }
        }
    }

    fn require(&self, ok: bool, pos: Pos, op: BinOp, lt: Ty, rt: Ty) -> CompileResult<()> {
        if ok {
            Ok(())
        } else {
            Err(self.err(
                pos,
                format!("operator {op:?} cannot be applied to {} and {}", ty_name(lt), ty_name(rt)),
            ))
        }
    }

    fn require_bool(&mut self, cond: &Expr, pos: Pos, context: &str) -> CompileResult<()> {
        let ty = self.check_expr(cond)?;
        if ty != Ty::Bool {
            return Err(self.err(pos, format!("{context} must be bool, found {}", ty_name(ty))));
        }
        Ok(())
    }

    fn in_scope(&mut self, f: impl FnOnce(&mut Self) -> CompileResult<()>) -> CompileResult<()> {
        self.scopes.enter_scope();
        let result = f(self);
        self.scopes.exit_scope();
        result
    }

    fn name(&self, sym: minic_util::Symbol) -> &str {
        self.interner.as_str(sym)
    }

    fn err(&self, pos: Pos, message: impl Into<String>) -> CompileError {
        CompileError::semantic(pos, message)
    }
}

fn ty_name(ty: Ty) -> &'static str {
    match ty {
        Ty::Int => "int",
        Ty::Bool => "bool",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minic_util::Interner;

    fn check_src(src: &str) -> CompileResult<()> {
        let mut interner = Interner::new();
        let tokens = minic_lex::lex(src, &mut interner).unwrap();
        let program = minic_par::parse(&tokens).unwrap();
        check(&program, &interner)
    }

    #[test]
    fn redeclaration_in_same_scope_is_an_error() {
        let err = check_src("int x; int x;").unwrap_err();
        assert!(matches!(err, CompileError::Semantic { .. }));
    }

    #[test]
    fn shadowing_in_nested_block_is_allowed() {
        assert!(check_src("int x; { int x; }").is_ok());
    }

    #[test]
    fn undeclared_use_is_an_error() {
        let err = check_src("int x; x = y;").unwrap_err();
        assert!(matches!(err, CompileError::Semantic { .. }));
    }

    #[test]
    fn assigning_bool_to_int_is_a_type_mismatch() {
        let err = check_src("int x; bool b; x = b;").unwrap_err();
        assert!(matches!(err, CompileError::Semantic { .. }));
    }

    #[test]
    fn if_condition_must_be_bool() {
        let err = check_src("int x; x = 1; if (x) { print(x); }").unwrap_err();
        assert!(matches!(err, CompileError::Semantic { .. }));
    }

    #[test]
    fn print_accepts_either_type() {
        assert!(check_src("int x; x = 1; print(x); bool b; b = true; print(b);").is_ok());
    }

    #[test]
    fn bool_equality_is_accepted() {
        assert!(check_src("bool a; bool b; a = true; b = false; print(a == b);").is_ok());
    }

    #[test]
    fn well_typed_while_loop_passes() {
        assert!(check_src("int x; x = 1; while (x < 10) { x = x * 2; print(x); }").is_ok());
    }
}
