//! minic-util - Core Utilities and Foundation Types
//!
//! ================================================================
//! MODULE OVERVIEW
//! ================================================================
//!
//! This crate provides the small set of shared types used by every phase of
//! the MiniC pipeline: source positions, interned identifiers, a typed index
//! vector, and the compiler-wide error representation.
//!
//! None of these types carry phase-specific knowledge. A lexer error and a
//! semantic error are both just a [`CompileError`] variant with a line/column
//! and a message, so the driver can format and report them uniformly.
//!
//! DESIGN PRINCIPLES:
//!
//! 1. NO SHARED MUTABLE STATE ACROSS COMPILATIONS
//!    An [`Interner`](symbol::Interner) belongs to exactly one compilation
//!    session. There is no process-global symbol table, so two compilations
//!    running in the same process (as happens in the test suite) can never
//!    leak symbols into one another.
//!
//! 2. TYPE-SAFE INDICES OVER BARE `usize`
//!    [`IndexVec<I, T>`](index_vec::IndexVec) pairs a `Vec<T>` with a
//!    phantom index type, so a temporary index and a label index are
//!    distinct types even though both are, underneath, a `u32`.
//!
//! 3. ONE ERROR TYPE, FOUR KINDS
//!    [`CompileError`] is flat rather than nested per phase. Every phase
//!    constructs it through a `CompileError::<phase>(pos, message)`
//!    constructor and the driver never needs to match on which phase failed
//!    to report the failure uniformly.
//!
//! ================================================================
//! STRING INTERNING (SYMBOL)
//! ================================================================
//!
//! THEORY OF STRING INTERNING:
//!
//! An identifier like `counter` appears many times across a source file:
//! once at its declaration, and again at every use. Comparing identifiers
//! by string equality means comparing every shared prefix's bytes on every
//! comparison; a symbol table makes each distinct string exist exactly once
//! and hands out a small integer handle in its place, so `a == b` for two
//! identifiers becomes `u32 == u32`.
//!
//! See [`symbol::Interner`] for the concrete per-compilation implementation.

pub mod error;
pub mod index_vec;
pub mod pos;
pub mod source;
pub mod symbol;

pub use error::{CompileError, CompileResult};
pub use index_vec::{Idx, IndexVec};
pub use pos::Pos;
pub use source::SourceFile;
pub use symbol::{Interner, Symbol};

pub use rustc_hash::{FxHashMap, FxHashSet};
