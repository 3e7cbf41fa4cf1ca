//! minic-ir - Three-Address Code and the Optimizer
//!
//! Two halves: `lower` turns a type-checked AST into a flat TAC program,
//! and `opt` turns a TAC program into an optimized one via a fixpoint over
//! five local passes. Neither half touches the source AST or the
//! assembly text directly — TAC is the seam between the front end and the
//! code generator.

pub mod lower;
pub mod opt;
pub mod tac;

pub use lower::lower;
pub use opt::optimize;
pub use tac::{LabelId, Operand, TacInstr, TempId, Ty};
