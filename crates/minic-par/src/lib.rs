//! minic-par - Parser (Syntactic Analyzer)
//!
//! ================================================================
//! PARSING THEORY
//! ================================================================
//!
//! FORMAL DEFINITION:
//!
//! MiniC's grammar is a tuple G = (N, T, P, S): nonterminals N (`Program`,
//! `Stmt`, the precedence-level expression productions), terminals T (the
//! `TokenKind`s from `minic-lex`), productions P (the `fn` bodies below),
//! and start symbol S (`Program`). Parsing is the inverse of lexing: given
//! a token sequence, recover the derivation tree the grammar would have
//! produced it from.
//!
//! GRAMMAR NOTATION (informal EBNF for the expression grammar):
//!
//! ```text
//! expr     ::= or_expr
//! or_expr  ::= and_expr ( "||" and_expr )*
//! and_expr ::= eq_expr  ( "&&" eq_expr )*
//! eq_expr  ::= rel_expr ( ("==" | "!=") rel_expr )*
//! rel_expr ::= add_expr ( ("<" | ">" | "<=" | ">=") add_expr )*
//! add_expr ::= mul_expr ( ("+" | "-") mul_expr )*
//! mul_expr ::= unary    ( ("*" | "/" | "%") unary )*
//! unary    ::= ("!" | "-") unary | primary
//! primary  ::= NUMBER | "true" | "false" | IDENT | "(" expr ")"
//! ```
//!
//! Builds a `Program` from a token vector by recursive descent, with
//! precedence climbing for expressions. The grammar is a cascade of
//! one function per precedence level (`or_expr` calls `and_expr` calls
//! `eq_expr` ... calls `primary`), which is the direct reading of the
//! operator-precedence table above rather than a single Pratt loop: each
//! level only ever needs to know the operators at its own level.

pub mod ast;

pub use ast::*;

use minic_lex::{Token, TokenKind};
use minic_util::{CompileError, CompileResult, Pos};

pub fn parse(tokens: &[Token]) -> CompileResult<Program> {
    Parser::new(tokens).parse_program()
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse_program(&mut self) -> CompileResult<Program> {
        let mut stmts = Vec::new();
        while !self.at(TokenKind::Eof) {
            stmts.push(self.statement()?);
        }
        Ok(Program { stmts })
    }

    // ---- statements ----

    fn statement(&mut self) -> CompileResult<Stmt> {
        match self.current().kind {
            TokenKind::Int | TokenKind::Bool => self.var_decl(),
            TokenKind::Ident(_) => self.assignment(),
            TokenKind::If => self.if_stmt(),
            TokenKind::While => self.while_stmt(),
            TokenKind::Print => self.print_stmt(),
            TokenKind::LBrace => self.block(),
            _ => Err(self.unexpected("a statement")),
        }
    }

    fn var_decl(&mut self) -> CompileResult<Stmt> {
        let pos = self.current().pos;
        let ty = match self.advance().kind {
            TokenKind::Int => Ty::Int,
            TokenKind::Bool => Ty::Bool,
            _ => unreachable!("var_decl only called on Int/Bool"),
        };
        let name = self.expect_ident()?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::VarDecl { ty, name, pos })
    }

    fn assignment(&mut self) -> CompileResult<Stmt> {
        let pos = self.current().pos;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Assign)?;
        let expr = self.expr()?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::Assign { name, expr, pos })
    }

    fn if_stmt(&mut self) -> CompileResult<Stmt> {
        let pos = self.current().pos;
        self.advance();
        self.expect(TokenKind::LParen)?;
        let cond = self.expr()?;
        self.expect(TokenKind::RParen)?;
        let then_stmts = self.unwrapped_block()?;
        let else_stmts = if self.at(TokenKind::Else) {
            self.advance();
            self.unwrapped_block()?
        } else {
            Vec::new()
        };
        Ok(Stmt::If { cond, then_stmts, else_stmts, pos })
    }

    fn while_stmt(&mut self) -> CompileResult<Stmt> {
        let pos = self.current().pos;
        self.advance();
        self.expect(TokenKind::LParen)?;
        let cond = self.expr()?;
        self.expect(TokenKind::RParen)?;
        let body = self.unwrapped_block()?;
        Ok(Stmt::While { cond, body, pos })
    }

    fn print_stmt(&mut self) -> CompileResult<Stmt> {
        let pos = self.current().pos;
        self.advance();
        self.expect(TokenKind::LParen)?;
        let expr = self.expr()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::Print { expr, pos })
    }

    fn block(&mut self) -> CompileResult<Stmt> {
        let pos = self.current().pos;
        let stmts = self.unwrapped_block()?;
        Ok(Stmt::Block { stmts, pos })
    }

    /// Parses a brace-delimited block and returns its inner statements
    /// directly, without the `Block` wrapper — used by `if`/`while` whose
    /// then/else/body lists are flat per the grammar.
    fn unwrapped_block(&mut self) -> CompileResult<Vec<Stmt>> {
        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.at(TokenKind::RBrace) {
            stmts.push(self.statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(stmts)
    }

    // ---- expressions, by precedence level, lowest to highest ----

    fn expr(&mut self) -> CompileResult<Expr> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> CompileResult<Expr> {
        self.left_assoc(Self::and_expr, &[(TokenKind::OrOr, BinOp::Or)])
    }

    fn and_expr(&mut self) -> CompileResult<Expr> {
        self.left_assoc(Self::eq_expr, &[(TokenKind::AndAnd, BinOp::And)])
    }

    fn eq_expr(&mut self) -> CompileResult<Expr> {
        self.left_assoc(
            Self::rel_expr,
            &[(TokenKind::EqEq, BinOp::Eq), (TokenKind::NotEq, BinOp::Ne)],
        )
    }

    fn rel_expr(&mut self) -> CompileResult<Expr> {
        self.left_assoc(
            Self::add_expr,
            &[
                (TokenKind::Lt, BinOp::Lt),
                (TokenKind::Gt, BinOp::Gt),
                (TokenKind::Le, BinOp::Le),
                (TokenKind::Ge, BinOp::Ge),
            ],
        )
    }

    fn add_expr(&mut self) -> CompileResult<Expr> {
        self.left_assoc(
            Self::mul_expr,
            &[(TokenKind::Plus, BinOp::Add), (TokenKind::Minus, BinOp::Sub)],
        )
    }

    fn mul_expr(&mut self) -> CompileResult<Expr> {
        self.left_assoc(
            Self::unary,
            &[
                (TokenKind::Star, BinOp::Mul),
                (TokenKind::Slash, BinOp::Div),
                (TokenKind::Percent, BinOp::Mod),
            ],
        )
    }

    /// Shared shape for every left-associative binary level: parse one
    /// operand at the next-tighter level, then fold in `(op, operand)*`.
    fn left_assoc(
        &mut self,
        mut next: impl FnMut(&mut Self) -> CompileResult<Expr>,
        ops: &[(TokenKind, BinOp)],
    ) -> CompileResult<Expr> {
        let mut left = next(self)?;
        loop {
            let Some(&(_, op)) = ops.iter().find(|(kind, _)| self.at(*kind)) else {
                break;
            };
            let pos = self.current().pos;
            self.advance();
            let right = next(self)?;
            left = Expr::BinaryOp { op, left: Box::new(left), right: Box::new(right), pos };
        }
        Ok(left)
    }

    fn unary(&mut self) -> CompileResult<Expr> {
        let pos = self.current().pos;
        let op = match self.current().kind {
            TokenKind::Bang => UnOp::Not,
            TokenKind::Minus => UnOp::Neg,
            _ => return self.primary(),
        };
        self.advance();
        let operand = self.unary()?;
        Ok(Expr::UnaryOp { op, operand: Box::new(operand), pos })
    }

    fn primary(&mut self) -> CompileResult<Expr> {
        let tok = self.current();
        match tok.kind {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expr::IntLiteral { value, pos: tok.pos })
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::BoolLiteral { value: true, pos: tok.pos })
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::BoolLiteral { value: false, pos: tok.pos })
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Identifier { name, pos: tok.pos })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    // ---- token-stream primitives ----

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos];
        if !matches!(tok.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Pos> {
        if self.at(kind) {
            Ok(self.advance().pos)
        } else {
            Err(self.unexpected_kind(kind))
        }
    }

    fn expect_ident(&mut self) -> CompileResult<minic_util::Symbol> {
        match self.current().kind {
            TokenKind::Ident(sym) => {
                self.advance();
                Ok(sym)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        CompileError::parser(
            self.current().pos,
            format!("expected {expected}, found {:?}", self.current().kind),
        )
    }

    fn unexpected_kind(&self, expected: TokenKind) -> CompileError {
        CompileError::parser(
            self.current().pos,
            format!("expected {expected:?}, found {:?}", self.current().kind),
        )
    }
}
