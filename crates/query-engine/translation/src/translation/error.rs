//! Errors for query translation.

use query_engine_metadata::metadata::{ScalarType, UnknownField};

use super::filter::SyntaxError;

/// The query parameter an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Filter,
    OrderBy,
    Top,
    Skip,
    Select,
    Count,
    InlineCount,
}

impl Parameter {
    /// The name of the parameter in a query string.
    pub fn name(self) -> &'static str {
        match self {
            Parameter::Filter => "$filter",
            Parameter::OrderBy => "$orderby",
            Parameter::Top => "$top",
            Parameter::Skip => "$skip",
            Parameter::Select => "$select",
            Parameter::Count => "$count",
            Parameter::InlineCount => "$inlinecount",
        }
    }

    /// Recognise a system query option by name.
    pub fn from_name(name: &str) -> Option<Parameter> {
        match name {
            "$filter" => Some(Parameter::Filter),
            "$orderby" => Some(Parameter::OrderBy),
            "$top" => Some(Parameter::Top),
            "$skip" => Some(Parameter::Skip),
            "$select" => Some(Parameter::Select),
            "$count" => Some(Parameter::Count),
            "$inlinecount" => Some(Parameter::InlineCount),
            _ => None,
        }
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A request could not be translated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {parameter}: {kind}")]
pub struct Error {
    pub parameter: Parameter,
    pub kind: ErrorKind,
}

impl Error {
    pub fn new(parameter: Parameter, kind: impl Into<ErrorKind>) -> Error {
        Error {
            parameter,
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    #[error(transparent)]
    SyntaxError(#[from] SyntaxError),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{0}' cannot be filtered on")]
    NotFilterable(String),
    #[error("field '{0}' cannot be sorted on")]
    NotSortable(String),
    #[error("field '{field}' has type {expected} and cannot be compared with a {found} literal")]
    TypeMismatch {
        field: String,
        expected: ScalarType,
        found: ScalarType,
    },
    #[error("field '{0}' appears more than once")]
    DuplicateSortField(String),
    #[error("{0}")]
    InvalidParameter(String),
}

impl From<UnknownField> for ErrorKind {
    fn from(UnknownField(name): UnknownField) -> ErrorKind {
        ErrorKind::UnknownField(name)
    }
}
