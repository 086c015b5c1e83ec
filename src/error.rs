use nom::error::{ErrorKind, ParseError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{field} of length {len} does not fit its wire field (max {max})")]
    Encoding {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Message truncated")]
    TruncatedMessage,

    #[error("No {0} to encode")]
    EmptyList(&'static str),

    #[error("Framing error: {0}")]
    Framing(&'static str),

    #[error("Unsupported handshake message type {0}")]
    UnsupportedMessageType(u8),

    #[error("Too big handshake length {0} (max {1})")]
    TooBigLength(usize, usize),

    #[error("Too many {0} (max {1})")]
    TooManyEntries(&'static str, usize),

    #[error("Parse error: {0:?}")]
    Parse(ErrorKind),

    #[error("Crypto error: {0}")]
    Crypto(&'static str),
}

impl Error {
    pub(crate) fn encoding(field: &'static str, len: usize, max: usize) -> Self {
        Error::Encoding { field, len, max }
    }

    /// Wrap as a nom failure so combinators stop backtracking.
    pub(crate) fn fail(self) -> nom::Err<Error> {
        nom::Err::Failure(self)
    }
}

impl<I> ParseError<I> for Error {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Eof | ErrorKind::Complete => Error::TruncatedMessage,
            _ => Error::Parse(kind),
        }
    }

    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl From<nom::Err<Error>> for Error {
    fn from(value: nom::Err<Error>) -> Self {
        match value {
            nom::Err::Incomplete(_) => Error::TruncatedMessage,
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
        }
    }
}
