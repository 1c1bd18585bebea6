use thiserror::Error;

pub type BracketResult<T> = Result<T, BracketError>;

/// Failure categories surfaced by every bracket operation.
///
/// Nothing here is retried internally. A failed call leaves the bracket
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BracketError {
    /// Malformed arguments: too few teams, tied or negative scores, a round
    /// outside the bracket.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Unknown match id, or a ledger miss. The latter means round/position
    /// bookkeeping drifted and is a bug, not a user error.
    #[error("not found: {0}")]
    NotFound(String),
    /// The match cannot be decided yet because one of its slots is unresolved.
    #[error("illegal state: {0}")]
    IllegalState(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    IllegalState,
}

impl BracketError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BracketError::InvalidInput(_) => ErrorKind::InvalidInput,
            BracketError::NotFound(_) => ErrorKind::NotFound,
            BracketError::IllegalState(_) => ErrorKind::IllegalState,
        }
    }

    /// Human-readable reason without the category prefix, for inline form
    /// validation messages.
    pub fn reason(&self) -> &str {
        match self {
            BracketError::InvalidInput(msg)
            | BracketError::NotFound(msg)
            | BracketError::IllegalState(msg) => msg,
        }
    }
}
