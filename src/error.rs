use thiserror::Error;

pub type Result<T> = std::result::Result<T, StlError>;

/// Everything that can go wrong while reading or writing STL.
///
/// Reaching the end of a stream is not an error; decoders report it by
/// returning `Ok(None)`.
#[derive(Error, Debug)]
pub enum StlError {
    /// Failure of the underlying stream, including short reads.
    #[error("stl: I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The text input had no non-blank line.
    #[error("stl: stream ended before a \"solid \" line")]
    MissingSolid,

    /// A text line did not start with the token expected at that position.
    #[error("stl: expected {expected:?}, found {found:?}")]
    UnexpectedLine {
        expected: &'static str,
        found: String,
    },

    /// The text input ended inside a facet.
    #[error("stl: stream ended while expecting {expected:?}")]
    UnexpectedEof { expected: &'static str },

    /// A vector did not have exactly three fields.
    #[error("stl: invalid vector text: {0:?}")]
    InvalidVector(String),

    /// A vector field was not a number.
    #[error("stl: invalid number {token:?} in {line:?}")]
    InvalidNumber { token: String, line: String },

    /// `endsolid` named a different solid than `solid`.
    #[error("stl: unexpected endsolid name {found:?}, solid is {expected:?}")]
    NameMismatch { expected: String, found: String },

    /// More triangles than the binary encoder declared, or than a binary
    /// count can hold.
    #[error("stl: capacity of {declared} triangles exceeded")]
    CapacityExceeded { declared: u64 },
}
