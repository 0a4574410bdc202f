use std::io;

/// Structural problems found while parsing source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unmatched '[' at byte {position}")]
    UnmatchedOpen { position: usize },
    #[error("unmatched ']' at byte {position}")]
    UnmatchedClose { position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported cell width: {0} (expected 8, 16, 32 or 64)")]
    UnsupportedWidth(u32),
    #[error("invalid cell width '{0}'")]
    InvalidWidth(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("tape access below cell 0 (index {index})")]
    TapeUnderflow { index: isize },
}

/// Any failure of the compile-and-run pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Run(#[from] RunError),
}
