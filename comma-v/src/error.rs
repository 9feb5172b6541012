use nom::error::ErrorKind;
use thiserror::Error;

/// Errors raised while parsing, emitting, or mutating an RCS `,v` file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error of kind {kind:?} at byte offset {offset}")]
    ParseError { offset: usize, kind: ErrorKind },

    #[error("malformed token or unterminated @-string at byte offset {offset}")]
    LexError { offset: usize },

    #[error("invalid revision number {0:?}")]
    InvalidNum(String),

    #[error("revision {0} is not known in this file")]
    UnknownRevision(crate::Num),

    #[error("revision {0} is already present")]
    DuplicateRevision(crate::Num),

    #[error("invalid value for {field}: {reason}")]
    InvariantViolation { field: &'static str, reason: String },

    #[error(transparent)]
    Diff(#[from] rcs_ed::Error),
}
