use thiserror::Error;

// -----------------------------------------------------------------------------
// IoError

/// Errors raised by [`DataOutput`](crate::DataOutput) and
/// [`DataInput`](crate::DataInput).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IoError {
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("the sink refused to accept {0} more bytes")]
    WriteZero(usize),

    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid length prefix {0}")]
    InvalidLength(i64),
}
