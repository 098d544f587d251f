use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by buffer views.
///
/// Every variant is a contract violation detected at the call site.
/// A failing operation leaves cursor and storage untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("index out of bound: {0}")]
    IndexOutOfBound(String),
    #[error("buffer underflow")]
    BufferUnderflow,
    #[error("buffer overflow")]
    BufferOverflow,
    #[error("buffer is read-only")]
    ReadOnly,
    #[error("mark is not set")]
    InvalidMark,
    #[error("internal error: {0}")]
    InternalError(String),
}
