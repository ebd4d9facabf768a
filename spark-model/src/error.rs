use std::io;
use thiserror::Error;

/// Error types for Spark model parsing and reconstruction
#[derive(Error, Debug)]
pub enum MdlError {
    /// I/O error during reading or writing
    #[error("I/O error: {0}")]
    Io(io::Error),

    /// Invalid magic number in the file header
    #[error("Invalid magic: expected {expected:?}, found {found:?}")]
    InvalidMagic { expected: [u8; 4], found: [u8; 4] },

    /// A decoder needed more bytes than the stream had left.
    ///
    /// Distinct from normal termination, which is only recognized when
    /// zero bytes remain at a chunk-header boundary.
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<io::Error> for MdlError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            MdlError::UnexpectedEof
        } else {
            MdlError::Io(err)
        }
    }
}

/// Result type using MdlError
pub type Result<T> = std::result::Result<T, MdlError>;
