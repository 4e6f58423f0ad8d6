//! Handle filtering/where clauses translation.

use query_engine_metadata::metadata::{
    self, FieldDescriptor, ScalarType, SqlPath, TABLE_NAME,
};
use query_engine_sql::sql;

use super::fields::translate_field;
use super::values;
use crate::translation::error::{Error, ErrorKind, Parameter};
use crate::translation::filter::{
    ComparisonOperator, FilterNode, Literal, LogicalOperator, StringFunction,
};

/// Resolve every field of a parsed filter against the registry and check that each
/// literal can be compared with the field it is compared with.
pub fn resolve_filter(node: FilterNode) -> Result<FilterNode<FieldDescriptor>, Error> {
    resolve_node(node).map_err(|kind| Error::new(Parameter::Filter, kind))
}

fn resolve_node(node: FilterNode) -> Result<FilterNode<FieldDescriptor>, ErrorKind> {
    match node {
        FilterNode::Comparison {
            field,
            operator,
            literal,
        } => {
            let field = resolve_filterable(&field)?;
            check_literal_type(&field, &literal)?;
            Ok(FilterNode::Comparison {
                field,
                operator,
                literal,
            })
        }
        FilterNode::Logical {
            operator,
            left,
            right,
        } => Ok(FilterNode::Logical {
            operator,
            left: Box::new(resolve_node(*left)?),
            right: Box::new(resolve_node(*right)?),
        }),
        FilterNode::FunctionCall {
            function,
            field,
            literal,
        } => {
            let field = resolve_filterable(&field)?;
            // string functions never coerce
            let found = values::literal_type(&literal);
            if field.r#type != ScalarType::String || found != ScalarType::String {
                return Err(ErrorKind::TypeMismatch {
                    field: field.name,
                    expected: ScalarType::String,
                    found,
                });
            }
            Ok(FilterNode::FunctionCall {
                function,
                field,
                literal,
            })
        }
    }
}

fn resolve_filterable(name: &str) -> Result<FieldDescriptor, ErrorKind> {
    let field = metadata::resolve(name)?;
    if field.filterable {
        Ok(field)
    } else {
        Err(ErrorKind::NotFilterable(field.name))
    }
}

fn check_literal_type(field: &FieldDescriptor, literal: &Literal) -> Result<(), ErrorKind> {
    let found = values::literal_type(literal);
    if field.accepts(found) {
        Ok(())
    } else {
        Err(ErrorKind::TypeMismatch {
            field: field.name.clone(),
            expected: field.r#type,
            found,
        })
    }
}

/// Translate a resolved filter into a boolean SQL expression.
pub fn translate_expression(node: &FilterNode<FieldDescriptor>) -> sql::ast::Expression {
    match node {
        FilterNode::Logical {
            operator,
            left,
            right,
        } => {
            let left = Box::new(translate_expression(left));
            let right = Box::new(translate_expression(right));
            match operator {
                LogicalOperator::And => sql::ast::Expression::And { left, right },
                LogicalOperator::Or => sql::ast::Expression::Or { left, right },
            }
        }
        FilterNode::Comparison {
            field,
            operator,
            literal,
        } => sql::ast::Expression::BinaryOperation {
            left: Box::new(translate_comparison_target(field, literal)),
            operator: translate_operator(*operator),
            right: Box::new(sql::ast::Expression::Value(values::translate_literal(
                literal,
            ))),
        },
        FilterNode::FunctionCall {
            function,
            field,
            literal,
        } => sql::ast::Expression::Like {
            expression: Box::new(translate_field(field)),
            pattern: Box::new(sql::ast::Expression::Value(sql::ast::Value::String(
                translate_pattern(*function, literal),
            ))),
        },
    }
}

/// The left hand side of a comparison. Metadata members compared with a number or a
/// boolean are converted only when they hold that JSON type, other members compare as NULL.
fn translate_comparison_target(field: &FieldDescriptor, literal: &Literal) -> sql::ast::Expression {
    let literal_type = values::literal_type(literal);
    match (&field.sql_path, values::coercion_type(literal_type)) {
        (SqlPath::JsonKey { column, key }, Some(r#type)) if literal_type != field.r#type => {
            sql::ast::Expression::TypedJsonField {
                expression: Box::new(sql::helpers::make_column(
                    sql::helpers::table_reference(TABLE_NAME),
                    column.name(),
                )),
                key: key.clone(),
                r#type,
            }
        }
        _ => translate_field(field),
    }
}

fn translate_operator(operator: ComparisonOperator) -> sql::ast::BinaryOperator {
    match operator {
        ComparisonOperator::Eq => sql::ast::BinaryOperator::Equals,
        ComparisonOperator::Ne => sql::ast::BinaryOperator::NotEquals,
        ComparisonOperator::Gt => sql::ast::BinaryOperator::GreaterThan,
        ComparisonOperator::Ge => sql::ast::BinaryOperator::GreaterThanOrEqualTo,
        ComparisonOperator::Lt => sql::ast::BinaryOperator::LessThan,
        ComparisonOperator::Le => sql::ast::BinaryOperator::LessThanOrEqualTo,
    }
}

fn translate_pattern(function: StringFunction, literal: &Literal) -> String {
    match literal {
        Literal::String(s) => values::like_pattern(function, s),
        // resolution only admits string literals in function calls
        other => values::like_pattern(function, &other.to_string()),
    }
}
