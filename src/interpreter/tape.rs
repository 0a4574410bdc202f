use super::cell::Cell;
use crate::error::RunError;

/// Cell storage addressed by absolute index.
pub(crate) trait Tape<C: Cell> {
    fn load(&mut self, index: isize) -> Result<C, RunError>;
    fn store(&mut self, index: isize, value: C) -> Result<(), RunError>;
    /// Called after every pointer move.
    fn seek(&mut self, pointer: isize);
    fn cells(&self) -> &[C];
}

/// Bounds-checked tape that doubles when the pointer runs past its end.
pub(crate) struct GrowableTape<C> {
    cells: Vec<C>,
}

impl<C: Cell> GrowableTape<C> {
    pub(crate) fn new(len: usize) -> Self {
        GrowableTape {
            cells: vec![C::default(); len],
        }
    }

    fn grow_to(&mut self, index: usize) {
        let mut len = self.cells.len().max(1);
        while len <= index {
            len *= 2;
        }
        tracing::debug!(from = self.cells.len(), to = len, "growing tape");
        self.cells.resize(len, C::default());
    }
}

impl<C: Cell> Tape<C> for GrowableTape<C> {
    #[inline]
    fn load(&mut self, index: isize) -> Result<C, RunError> {
        let idx = usize::try_from(index).map_err(|_| RunError::TapeUnderflow { index })?;
        Ok(self.cells.get(idx).copied().unwrap_or_default())
    }

    #[inline]
    fn store(&mut self, index: isize, value: C) -> Result<(), RunError> {
        let idx = usize::try_from(index).map_err(|_| RunError::TapeUnderflow { index })?;
        if idx >= self.cells.len() {
            self.grow_to(idx);
        }
        self.cells[idx] = value;
        Ok(())
    }

    #[inline]
    fn seek(&mut self, pointer: isize) {
        if let Ok(idx) = usize::try_from(pointer) {
            if idx >= self.cells.len() {
                self.grow_to(idx);
            }
        }
    }

    fn cells(&self) -> &[C] {
        &self.cells
    }
}

/// Fixed tape without bounds checks.
///
/// Only reachable through `Settings::with_unchecked_tape`, whose caller
/// promises the program never leaves `0..len`.
pub(crate) struct UncheckedTape<C> {
    cells: Vec<C>,
}

impl<C: Cell> UncheckedTape<C> {
    pub(crate) fn new(len: usize) -> Self {
        UncheckedTape {
            cells: vec![C::default(); len],
        }
    }

    /// The only place a cell address is computed.
    #[inline(always)]
    fn slot(&mut self, index: isize) -> *mut C {
        // SAFETY: in bounds by the contract of `Settings::with_unchecked_tape`.
        unsafe { self.cells.as_mut_ptr().offset(index) }
    }
}

impl<C: Cell> Tape<C> for UncheckedTape<C> {
    #[inline(always)]
    fn load(&mut self, index: isize) -> Result<C, RunError> {
        // SAFETY: see `slot`.
        Ok(unsafe { self.slot(index).read() })
    }

    #[inline(always)]
    fn store(&mut self, index: isize, value: C) -> Result<(), RunError> {
        // SAFETY: see `slot`.
        unsafe { self.slot(index).write(value) };
        Ok(())
    }

    #[inline(always)]
    fn seek(&mut self, _pointer: isize) {}

    fn cells(&self) -> &[C] {
        &self.cells
    }
}
