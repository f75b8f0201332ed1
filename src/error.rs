//! Crate-wide error type.

use thiserror::Error;

/// Errors surfaced by buffer I/O, codecs, and the SVG parser/emitter.
#[derive(Error, Debug)]
pub enum Error {
    #[error("buffer underflow: requested {requested} bytes, {available} available")]
    BufferUnderflow { requested: usize, available: usize },

    #[error("buffer overflow: requested {requested} bytes, {available} available")]
    BufferOverflow { requested: usize, available: usize },

    #[error("format violation: {0}")]
    FormatViolation(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid utf-8 in input")]
    Utf8,

    #[error("unexpected end of input at byte {0}")]
    UnexpectedEof(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
