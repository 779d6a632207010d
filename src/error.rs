use thiserror::Error;

/// A parse failure as reported by [`Reply::into_result`](crate::Reply::into_result).
///
/// The position, when present, is the offset the failing matcher was invoked at
/// (before any skip pattern ran), unless a combinator explicitly rewrote it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}{}", .position.map(|p| format!(" at position {}", p)).unwrap_or_default())]
pub struct ParseError {
    pub message: String,
    pub position: Option<usize>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

pub type ParseResult<T> = Result<(usize, T), ParseError>;

/// Errors raised before any parsing begins.
#[derive(Error, Debug)]
pub enum Error {
    #[error("start position {position} is out of range for a subject of length {length}")]
    PositionOutOfRange { position: usize, length: usize },
    #[error("start position {0} is not on a char boundary")]
    NotCharBoundary(usize),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("failed to read options: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse options: {0}")]
    Options(#[from] serde_json::Error),
}

pub type RunResult<T> = Result<T, Error>;
