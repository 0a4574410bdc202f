//! Optimizing compiler core for the eight-command tape language.
//!
//! Source text is parsed into a tree, optionally rewritten by three
//! optimization passes, lowered to a flat instruction array and executed by
//! a width-generic interpreter.

pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lower;
pub mod optimizer;
pub mod parser;
pub mod settings;

pub use error::{ConfigError, Error, ParseError, RunError};
pub use interpreter::{Flow, NoObserver, Observer, RunOutcome, Status, Step, StepBudget, run};
pub use lower::{Inst, Opcode};
pub use settings::{CellWidth, Settings, TapeMode};

/// Parse, optionally optimize, and lower `code`.
pub fn compile(code: &str, optimize: bool) -> Result<Vec<Inst>, ParseError> {
    let mut tree = parser::parse(code)?;
    if optimize {
        tree = optimizer::optimize(tree);
    }
    let program = lower::lower(&tree);
    if optimize {
        Ok(lower::allocate_registers(program))
    } else {
        Ok(program)
    }
}

/// Compile `code` per `settings` and run it on `input`, returning everything
/// it printed.
pub fn run_source(
    code: &str,
    settings: &Settings,
    input: &[u8],
) -> Result<(Vec<u8>, RunOutcome), Error> {
    let program = compile(code, settings.optimize)?;
    let mut output = Vec::new();
    let outcome = run(
        &program,
        settings,
        &mut &input[..],
        &mut output,
        &mut NoObserver,
    )?;
    Ok((output, outcome))
}
