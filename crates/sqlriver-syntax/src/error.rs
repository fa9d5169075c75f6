//! Error taxonomy visible to library callers.

use thiserror::Error;

use crate::lexer::TokenizeError;
use crate::parser::ParseError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("input of {size} bytes exceeds the {max_input_size} byte limit")]
    InputTooLarge { size: usize, max_input_size: usize },
}

impl Error {
    /// Line/column of the failure, when the error carries a location.
    pub fn location(&self) -> Option<(u32, u32)> {
        match self {
            Error::Tokenize(e) => Some((e.line, e.column)),
            Error::Parse(e) => Some((e.line, e.column)),
            Error::InputTooLarge { .. } => None,
        }
    }
}
