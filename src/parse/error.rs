use thiserror::Error;

/// Errors produced when parsing rule notation.
#[derive(Debug, Error)]
#[error("rule notation error: {message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
