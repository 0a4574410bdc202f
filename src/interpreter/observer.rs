use super::cell::TapeView;
use crate::lower::Inst;

/// What an observer wants after the current instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Stop once the current instruction has completed.
    Cancel,
}

/// Machine state just before an instruction executes.
#[derive(Debug, Clone, Copy)]
pub struct Step<'a> {
    pub tape: TapeView<'a>,
    pub pointer: isize,
    pub ip: usize,
    /// Instructions completed so far.
    pub steps: u64,
    pub inst: &'a Inst,
}

/// Per-step hook for tracers, debuggers and budgets.
pub trait Observer {
    fn before_step(&mut self, step: &Step<'_>) -> Flow;
}

impl<F> Observer for F
where
    F: FnMut(&Step<'_>) -> Flow,
{
    fn before_step(&mut self, step: &Step<'_>) -> Flow {
        self(step)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoObserver;

impl Observer for NoObserver {
    #[inline(always)]
    fn before_step(&mut self, _step: &Step<'_>) -> Flow {
        Flow::Continue
    }
}

/// Cancels the run once `limit` instructions have been executed.
///
/// Cancellation lands after the instruction being observed, so at least one
/// instruction always runs and a limit of zero behaves like a limit of one.
#[derive(Debug, Clone, Copy)]
pub struct StepBudget {
    limit: u64,
}

impl StepBudget {
    pub fn new(limit: u64) -> Self {
        StepBudget {
            limit: limit.max(1),
        }
    }
}

impl Observer for StepBudget {
    #[inline]
    fn before_step(&mut self, step: &Step<'_>) -> Flow {
        if step.steps + 1 >= self.limit {
            Flow::Cancel
        } else {
            Flow::Continue
        }
    }
}

/// Logs every step at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracer;

impl Observer for Tracer {
    fn before_step(&mut self, step: &Step<'_>) -> Flow {
        let cell = usize::try_from(step.pointer)
            .ok()
            .and_then(|idx| step.tape.get(idx));
        tracing::trace!(
            ip = step.ip,
            pointer = step.pointer,
            steps = step.steps,
            cell = ?cell,
            inst = %step.inst,
            "step"
        );
        Flow::Continue
    }
}
