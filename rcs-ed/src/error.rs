use thiserror::Error;

/// Errors raised while parsing or applying an RCS-style ed script.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid ed command: {0:?}")]
    InvalidCommand(String),

    #[error("missing ed command")]
    NoCommand,

    #[error("command on line {line} wanted {want} line(s) of content, got {have}")]
    EndOfScript { line: usize, want: usize, have: usize },

    #[error("command references line {position}, but the source has only {available} line(s)")]
    MalformedDiff { position: usize, available: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
