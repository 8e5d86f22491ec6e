use thiserror::Error;

/// Errors from [`parse`](crate::parse). Positions are character offsets into the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },

    #[error("unexpected token `{found}` at position {pos}")]
    UnexpectedToken { pos: usize, found: String },

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("no value is bound to variable `{0}`")]
    UnboundVariable(String),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("invalid number literal `{0}`")]
    InvalidNumber(String),
}
