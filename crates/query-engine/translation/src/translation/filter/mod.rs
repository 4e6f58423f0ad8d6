//! The `$filter` expression language.
//!
//! This module knows nothing about the schema: field names are kept as the raw strings the
//! client wrote and are resolved later, when the query plan is built.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{ComparisonOperator, FilterNode, Literal, LogicalOperator, StringFunction};
pub use parser::parse;

/// A malformed filter expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at position {position}")]
pub struct SyntaxError {
    /// Byte offset of the offending token in the filter text.
    pub position: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(position: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            position,
            message: message.into(),
        }
    }
}
