use std::fmt::Display;
use std::num::ParseFloatError;

#[derive(Debug)]
pub enum Error {
    ///A caller supplied a value outside the accepted range,
    /// e.g. a negative learning rate or an out of range label index
    InvalidArgument(String),
    ParseError(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Error::ParseError(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseFloatError> for Error {
    fn from(err: ParseFloatError) -> Self {
        Error::ParseError(err.to_string())
    }
}
