use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

pub const DEFAULT_TAPE_LEN: usize = 65536;

/// Width of one tape cell. Arithmetic wraps at this width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellWidth {
    I8,
    I16,
    I32,
    I64,
}

impl CellWidth {
    pub const ALL: [CellWidth; 4] = [CellWidth::I8, CellWidth::I16, CellWidth::I32, CellWidth::I64];

    pub fn from_bits(bits: u32) -> Result<Self, ConfigError> {
        match bits {
            8 => Ok(CellWidth::I8),
            16 => Ok(CellWidth::I16),
            32 => Ok(CellWidth::I32),
            64 => Ok(CellWidth::I64),
            other => Err(ConfigError::UnsupportedWidth(other)),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            CellWidth::I8 => 8,
            CellWidth::I16 => 16,
            CellWidth::I32 => 32,
            CellWidth::I64 => 64,
        }
    }
}

impl FromStr for CellWidth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidWidth(s.to_string()))?;
        CellWidth::from_bits(bits)
    }
}

impl fmt::Display for CellWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapeMode {
    /// Bounds-checked; the tape doubles whenever the pointer runs past it.
    Growable,
    /// Fixed length with no bounds checks. Out-of-range access is undefined
    /// behaviour.
    Unchecked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub width: CellWidth,
    tape_len: usize,
    pub optimize: bool,
    /// Flush the output stream after every byte written.
    pub flush: bool,
    tape_mode: TapeMode,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            width: CellWidth::I8,
            tape_len: DEFAULT_TAPE_LEN,
            optimize: true,
            flush: false,
            tape_mode: TapeMode::Growable,
        }
    }
}

impl Settings {
    pub fn new(width: CellWidth) -> Self {
        Settings {
            width,
            ..Settings::default()
        }
    }

    pub fn with_tape_len(self, tape_len: usize) -> Self {
        Settings { tape_len, ..self }
    }

    pub fn with_optimize(self, optimize: bool) -> Self {
        Settings { optimize, ..self }
    }

    pub fn with_flush(self, flush: bool) -> Self {
        Settings { flush, ..self }
    }

    /// Run on a fixed tape without bounds checks.
    ///
    /// The tape length is only reachable through the builders, so safe code
    /// cannot shrink it behind this promise:
    ///
    /// ```compile_fail
    /// let mut settings = unsafe { bfcore::Settings::default().with_unchecked_tape() };
    /// settings.tape_len = 1;
    /// ```
    ///
    /// # Safety
    /// Every program run with these settings must keep all tape accesses
    /// inside `0..tape_len()`.
    pub unsafe fn with_unchecked_tape(self) -> Self {
        Settings {
            tape_mode: TapeMode::Unchecked,
            ..self
        }
    }

    /// Initial number of cells.
    pub fn tape_len(&self) -> usize {
        self.tape_len
    }

    pub fn tape_mode(&self) -> TapeMode {
        self.tape_mode
    }
}
