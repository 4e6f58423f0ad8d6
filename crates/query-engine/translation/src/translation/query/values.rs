//! Handle the translation of literal values.

use query_engine_metadata::metadata::ScalarType;
use query_engine_sql::sql;

use crate::translation::filter::{Literal, StringFunction};

/// The scalar type of a literal as written by a client.
pub fn literal_type(literal: &Literal) -> ScalarType {
    match literal {
        Literal::String(_) => ScalarType::String,
        Literal::Number(_) => ScalarType::Number,
        Literal::Boolean(_) => ScalarType::Boolean,
    }
}

/// Convert a literal into a value bound as a query parameter.
pub fn translate_literal(literal: &Literal) -> sql::ast::Value {
    match literal {
        Literal::String(s) => sql::ast::Value::String(s.clone()),
        Literal::Number(n) => sql::ast::Value::Float8(*n),
        Literal::Boolean(b) => sql::ast::Value::BoundBool(*b),
    }
}

/// The type a metadata member has to be converted to before comparing it with a literal of
/// the given type, if any.
pub fn coercion_type(literal_type: ScalarType) -> Option<sql::ast::ScalarType> {
    match literal_type {
        ScalarType::Number => Some(sql::ast::ScalarType::DoublePrecision),
        ScalarType::Boolean => Some(sql::ast::ScalarType::Boolean),
        ScalarType::String | ScalarType::Json => None,
    }
}

/// Build the LIKE pattern of a string function.
///
/// The pattern's escape character is `\`, so `\`, `%` and `_` in the text are escaped
/// before the wildcards are added.
pub fn like_pattern(function: StringFunction, text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    match function {
        StringFunction::StartsWith => format!("{escaped}%"),
        StringFunction::EndsWith => format!("%{escaped}"),
        StringFunction::Contains => format!("%{escaped}%"),
    }
}
