//! CLI configuration.
//!
//! Hand-rolled flag parsing: the pipeline crates don't depend on a CLI
//! parsing crate, and the driver's flag set is small and fixed, so a
//! short loop over `args` is clearer than pulling in one just for this.

use anyhow::{bail, Context};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub input_file: PathBuf,
    pub output_file: Option<PathBuf>,
    pub show_tokens: bool,
    pub show_ast: bool,
    pub show_ir: bool,
    pub show_asm: bool,
    pub no_optimize: bool,
    pub verbose: bool,
}

impl Config {
    pub fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut input_file = None;
        let mut output_file = None;
        let mut show_tokens = false;
        let mut show_ast = false;
        let mut show_ir = false;
        let mut show_asm = false;
        let mut no_optimize = false;
        let mut verbose = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-o" | "--output" => {
                    let path = args.next().context("-o/--output requires a path argument")?;
                    output_file = Some(PathBuf::from(path));
                }
                "--show-tokens" => show_tokens = true,
                "--show-ast" => show_ast = true,
                "--show-ir" => show_ir = true,
                "--show-asm" => show_asm = true,
                "--no-optimize" => no_optimize = true,
                "--verbose" => verbose = true,
                other if other.starts_with('-') => bail!("unrecognized flag '{other}'"),
                other if input_file.is_none() => input_file = Some(PathBuf::from(other)),
                other => bail!("unexpected extra argument '{other}'"),
            }
        }

        let input_file = input_file.context("missing required input file argument")?;

        Ok(Self {
            input_file,
            output_file,
            show_tokens,
            show_ast,
            show_ir,
            show_asm,
            no_optimize,
            verbose,
        })
    }

    /// `build/<stem>.s` unless `-o` was given.
    pub fn resolved_output_path(&self) -> PathBuf {
        if let Some(path) = &self.output_file {
            return path.clone();
        }
        let stem = self.input_file.file_stem().unwrap_or_default();
        PathBuf::from("build").join(format!("{}.s", stem.to_string_lossy()))
    }
}
