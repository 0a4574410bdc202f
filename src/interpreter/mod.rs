//! Width-generic execution of lowered programs.
//!
//! The cell width and tape mode are resolved once per run; the fetch/execute
//! loop itself is monomorphized for each combination.

mod cell;
mod observer;
mod tape;

pub use cell::{Cell, TapeView};
pub use observer::{Flow, NoObserver, Observer, Step, StepBudget, Tracer};

use std::io::{self, Read, Write};

use crate::error::RunError;
use crate::lower::{Inst, Opcode};
use crate::settings::{CellWidth, Settings, TapeMode};
use tape::{GrowableTape, Tape, UncheckedTape};

/// Value stored by `Read` once the input is exhausted.
pub const EOF_SENTINEL: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub status: Status,
    pub steps: u64,
    pub pointer: isize,
    /// Final tape, sign-extended to 64 bits.
    pub cells: Vec<i64>,
}

/// Execute `program`, reading from `input` and writing to `output`.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(width = %settings.width, len = program.len())
)]
pub fn run<R, W, O>(
    program: &[Inst],
    settings: &Settings,
    input: &mut R,
    output: &mut W,
    observer: &mut O,
) -> Result<RunOutcome, RunError>
where
    R: Read,
    W: Write,
    O: Observer,
{
    let mut machine = Machine {
        input,
        output,
        observer,
        flush: settings.flush,
    };
    let outcome = match settings.width {
        CellWidth::I8 => machine.with_width::<i8>(program, settings),
        CellWidth::I16 => machine.with_width::<i16>(program, settings),
        CellWidth::I32 => machine.with_width::<i32>(program, settings),
        CellWidth::I64 => machine.with_width::<i64>(program, settings),
    }?;
    machine.output.flush()?;
    tracing::debug!(status = ?outcome.status, steps = outcome.steps, "run finished");
    Ok(outcome)
}

struct Machine<'a, R, W, O> {
    input: &'a mut R,
    output: &'a mut W,
    observer: &'a mut O,
    flush: bool,
}

impl<R: Read, W: Write, O: Observer> Machine<'_, R, W, O> {
    fn with_width<C: Cell>(
        &mut self,
        program: &[Inst],
        settings: &Settings,
    ) -> Result<RunOutcome, RunError> {
        match settings.tape_mode() {
            TapeMode::Growable => {
                self.execute(program, &mut GrowableTape::<C>::new(settings.tape_len()))
            }
            TapeMode::Unchecked => {
                self.execute(program, &mut UncheckedTape::<C>::new(settings.tape_len()))
            }
        }
    }

    fn execute<C: Cell, T: Tape<C>>(
        &mut self,
        program: &[Inst],
        tape: &mut T,
    ) -> Result<RunOutcome, RunError> {
        let mut ip = 0usize;
        let mut dp = 0isize;
        let mut steps = 0u64;
        let mut status = Status::Completed;
        while ip < program.len() {
            let inst = &program[ip];
            let flow = self.observer.before_step(&Step {
                tape: C::view(tape.cells()),
                pointer: dp,
                ip,
                steps,
                inst,
            });
            let Inst {
                op,
                dest,
                src,
                value,
            } = *inst;
            let dest = dp + dest as isize;
            let src = dp + src as isize;
            ip += 1;
            match op {
                Opcode::AddPtr => {
                    dp += value as isize;
                    tape.seek(dp);
                }
                Opcode::Assign => tape.store(dest, C::from_i64(value))?,
                Opcode::AddAssign => {
                    let cell = tape.load(dest)?;
                    tape.store(dest, cell.wrapping_add(C::from_i64(value)))?;
                }
                Opcode::MultAddAssign => {
                    let factor = tape.load(src)?.wrapping_mul(C::from_i64(value));
                    let cell = tape.load(dest)?;
                    tape.store(dest, cell.wrapping_add(factor))?;
                }
                Opcode::Put => {
                    self.output.write_all(&[tape.load(src)?.low_byte()])?;
                    if self.flush {
                        self.output.flush()?;
                    }
                }
                Opcode::Read => {
                    let cell = match read_byte(&mut *self.input)? {
                        Some(byte) => C::from_byte(byte),
                        None => C::from_i64(EOF_SENTINEL),
                    };
                    tape.store(dest, cell)?;
                }
                Opcode::BrTrue => {
                    if !tape.load(src)?.is_zero() {
                        ip = value as usize;
                    }
                }
                Opcode::BrFalse => {
                    if tape.load(src)?.is_zero() {
                        ip = value as usize;
                    }
                }
            }
            steps += 1;
            if flow == Flow::Cancel {
                tracing::debug!(ip, steps, "run cancelled");
                status = Status::Cancelled;
                break;
            }
        }
        Ok(RunOutcome {
            status,
            steps,
            pointer: dp,
            cells: C::view(tape.cells()).to_vec(),
        })
    }
}

fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8];
    match input.read_exact(&mut buf) {
        Ok(()) => Ok(Some(buf[0])),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}
