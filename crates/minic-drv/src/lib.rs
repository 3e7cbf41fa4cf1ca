//! minic-drv - Compiler Driver
//!
//! Thin orchestration layer: parses CLI flags into a `Config`, builds a
//! `Session` that owns the identifier interner and drives `compile()`
//! through the six phases in order, and reports the result. Library
//! crates stay on the precise `CompileError` enum; only this crate's
//! outermost entry point reaches for `anyhow`, to annotate file I/O
//! failures with the path involved.

mod config;

pub use config::Config;

use minic_util::{CompileError, CompileResult, Interner, SourceFile};
use std::fmt::Write as _;

pub struct Session {
    config: Config,
    interner: Interner,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config, interner: Interner::new() }
    }

    /// Runs `source` through all six phases, returning the generated
    /// assembly text. Fails fast with the first phase's `CompileError`.
    pub fn compile(&mut self, source: &SourceFile) -> CompileResult<String> {
        self.progress(&format!("lexing {}...", source.name));
        let tokens = minic_lex::lex(&source.content, &mut self.interner)?;
        if self.config.show_tokens {
            self.dump_tokens(&tokens);
        }

        self.progress("parsing...");
        let program = minic_par::parse(&tokens)?;
        if self.config.show_ast {
            self.dump_ast(&program);
        }

        self.progress("checking...");
        minic_sem::check(&program, &self.interner)?;

        self.progress("generating ir...");
        let tac = minic_ir::lower(&program);
        let before = tac.len();

        let tac = if self.config.no_optimize {
            self.progress(&format!("{before} TAC instructions, optimization skipped"));
            tac
        } else {
            let optimized = minic_ir::optimize(tac);
            self.progress(&format!(
                "{before} TAC instructions, optimized to {}",
                optimized.len()
            ));
            optimized
        };
        if self.config.show_ir {
            self.dump_ir(&tac);
        }

        self.progress("generating assembly...");
        let asm = minic_gen::generate(&tac, &self.interner);
        if self.config.show_asm {
            self.dump_asm(&asm);
        }

        Ok(asm)
    }

    fn progress(&self, message: &str) {
        if self.config.verbose {
            eprintln!("{message}");
        }
    }

    fn dump_tokens(&self, tokens: &[minic_lex::Token]) {
        println!("==== tokens ====");
        for token in tokens {
            println!("{token:?}");
        }
    }

    fn dump_ast(&self, program: &minic_par::Program) {
        println!("==== ast ====");
        println!("{program:#?}");
    }

    fn dump_ir(&self, tac: &[minic_ir::TacInstr]) {
        println!("==== ir ====");
        let mut out = String::new();
        for instr in tac {
            let _ = writeln!(out, "{}", instr.render(&self.interner));
        }
        print!("{out}");
    }

    fn dump_asm(&self, asm: &str) {
        println!("==== asm ====");
        print!("{asm}");
    }
}

/// Runs the driver end to end given raw process arguments (excluding
/// argv[0]), reading the input file and writing the output file.
/// Returns the process exit code.
pub fn run(args: impl IntoIterator<Item = String>) -> anyhow::Result<i32> {
    let config = Config::parse(args)?;

    let content = std::fs::read_to_string(&config.input_file).map_err(|e| {
        anyhow::anyhow!("reading input file '{}': {e}", config.input_file.display())
    })?;
    let source = SourceFile::new(config.input_file.display().to_string(), content);

    let output_path = config.resolved_output_path();
    let verbose = config.verbose;
    let mut session = Session::new(config);

    match session.compile(&source) {
        Ok(asm) => {
            if let Some(parent) = output_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        anyhow::anyhow!("creating output directory '{}': {e}", parent.display())
                    })?;
                }
            }
            std::fs::write(&output_path, asm).map_err(|e| {
                anyhow::anyhow!("writing output file '{}': {e}", output_path.display())
            })?;
            if verbose {
                eprintln!("wrote {}", output_path.display());
            }
            Ok(0)
        }
        Err(err) => {
            eprintln!("{err}");
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(cfg_args: &[&str]) -> Session {
        Session::new(Config::parse(cfg_args.iter().map(|s| s.to_string())).unwrap())
    }

    fn source(content: &str) -> SourceFile {
        SourceFile::new("prog.mc", content)
    }

    #[test]
    fn compiles_a_well_formed_program_to_assembly() {
        let mut s = session(&["prog.mc"]);
        let asm = s.compile(&source("int x; x = 2 + 3 * 4; print(x);")).unwrap();
        assert!(asm.contains("printf@PLT"));
    }

    #[test]
    fn surfaces_the_first_semantic_error() {
        let mut s = session(&["prog.mc"]);
        let err = s.compile(&source("int x; int x;")).unwrap_err();
        assert!(matches!(err, CompileError::Semantic { .. }));
    }

    #[test]
    fn no_optimize_still_produces_runnable_assembly() {
        let mut s = session(&["prog.mc", "--no-optimize"]);
        let asm = s.compile(&source("int x; x = 1; print(x);")).unwrap();
        assert!(asm.contains("printf@PLT"));
    }
}
