//! Error objects accepted by error-carrying levels

use std::error::Error;
use std::fmt::Write;

/// The message and stack text extracted from an error
///
/// Any `std::error::Error` converts into one: the message is its `Display`
/// output and the stack lists it followed by every `source()` in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    pub stack: String,
}

impl ErrorInfo {
    /// Build from explicit parts, for errors that do not implement `std::error::Error`
    pub fn new(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: stack.into(),
        }
    }

    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        let message = error.to_string();
        let mut stack = format!("Error: {}", message);

        let mut source = error.source();
        while let Some(cause) = source {
            // Writing to a String cannot fail
            let _ = write!(stack, "\n    caused by: {}", cause);
            source = cause.source();
        }

        Self { message, stack }
    }
}

impl<E: Error + ?Sized> From<&E> for ErrorInfo {
    fn from(error: &E) -> Self {
        Self::from_error(error)
    }
}
