//! Parses, manipulates, and emits RCS `,v` files: the append-only format
//! `rcs(1)`/`cvs(1)` use to store a file's complete revision history.
//!
//! The grammar-level pieces ([`types::Admin`], [`types::Delta`],
//! [`types::DeltaText`]) mirror the file's on-disk sections; [`Rcs`] and
//! [`RcsDelta`] are the merged, caller-facing model most code should use.

mod emitter;
mod error;
mod model;
mod num;
mod parser;
pub mod types;

pub use error::Error;
pub use model::{Rcs, RcsDelta};
pub use num::Num;

/// Parses a full RCS `,v` file.
pub fn parse(input: &[u8]) -> Result<Rcs, Error> {
    parser::file(input)
}

/// Serializes an [`Rcs`] value back into a byte-faithful `,v` file.
pub fn emit(rcs: &Rcs) -> Vec<u8> {
    emitter::emit(rcs)
}
