use thiserror::Error;

/// Errors produced while reading expression text.
///
/// Positions are byte offsets into the source string.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("invalid number '{text}' at {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("unknown name '{name}' at {pos}")]
    UnknownName { name: String, pos: usize },

    #[error("unknown function '{name}' at {pos}")]
    UnknownFunction { name: String, pos: usize },

    #[error("expected {expected} at {pos}")]
    Expected { expected: &'static str, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected trailing input at {pos}")]
    Trailing { pos: usize },

    #[error("expression nested too deeply at {pos}")]
    TooDeep { pos: usize },
}
