//! Error types surfaced by the path codec and the commit step.

use crate::statics;
use thiserror::Error;

/// Why strict path decoding rejected its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathErrorKind {
    #[error("path must start with '$'")]
    MissingRoot,

    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),

    #[error("unterminated segment")]
    Unterminated,

    #[error("empty key segment")]
    EmptyKey,

    #[error("array index does not fit in usize")]
    IndexOverflow,
}

/// A bracket path that [`crate::JsonPath::decode_strict`] could not read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path at byte {offset}: {kind}")]
pub struct PathParseError {
    /// Byte offset into the input where decoding stopped.
    pub offset: usize,
    pub kind: PathErrorKind,
}

impl PathParseError {
    #[inline]
    pub fn new(offset: usize, kind: PathErrorKind) -> Self {
        Self { offset, kind }
    }
}

/// A write that [`crate::set`] refused. The tree it was given is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    /// Writing here would grow an array past [`statics::MAX_ARRAY_INDEX`].
    #[error("array index {index} is past the largest writable index {max}", max = statics::MAX_ARRAY_INDEX)]
    IndexOutOfRange { index: usize },
}

/// A draft that could not be committed. The document is untouched.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The draft text does not parse. `Display` is the message shown to the user;
    /// the parser's own message is kept in `detail`.
    #[error("{}", statics::EN_ERR_INVALID_JSON)]
    InvalidDraft { detail: String },

    #[error(transparent)]
    Write(#[from] SetError),
}

impl CommitError {
    #[inline]
    pub fn invalid_draft(detail: impl Into<String>) -> Self {
        CommitError::InvalidDraft {
            detail: detail.into(),
        }
    }

    /// Parser diagnostics, for logs rather than for the user.
    pub fn detail(&self) -> Option<&str> {
        match self {
            CommitError::InvalidDraft { detail } => Some(detail),
            CommitError::Write(_) => None,
        }
    }
}
