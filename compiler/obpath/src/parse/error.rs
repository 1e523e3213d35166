//! Compile-time errors.

use thiserror::Error;

/// A positioned failure to compile a path expression.
///
/// The offset is a byte offset into [`expression`](Self::expression) and
/// always lies within `0..=expression.len()`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("syntax error in path {expression:?} at character {offset}: {message}")]
pub struct SyntaxError {
    expression: String,
    offset: usize,
    message: String,
}

impl SyntaxError {
    pub(crate) fn new(expression: &str, offset: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            expression: expression.to_owned(),
            offset: offset.min(expression.len()),
            message: message.into(),
        }
    }

    /// The full expression that failed to compile.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Where in the expression the problem was found.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// What went wrong, without the position prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}
