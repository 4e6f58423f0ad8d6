//! Handle `$orderby` and its translation to an ORDER BY clause.

use query_engine_metadata::metadata::{self, Column, FieldDescriptor};
use query_engine_sql::sql;

use super::fields::translate_field;
use super::plan::{Direction, OrderByElement};
use crate::translation::error::{Error, ErrorKind, Parameter};

/// Parse `$orderby`: a comma separated list of `field [asc|desc]`.
pub fn parse_order_by(raw: &str) -> Result<Vec<OrderByElement>, Error> {
    let invalid = |message: String| Error::new(Parameter::OrderBy, ErrorKind::InvalidParameter(message));

    let mut elements: Vec<OrderByElement> = vec![];
    for item in raw.split(',') {
        let mut words = item.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| invalid("expected a comma separated list of fields".to_string()))?;
        let direction = match words.next() {
            None => Direction::Asc,
            Some(word) if word.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(word) if word.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(word) => {
                return Err(invalid(format!(
                    "unknown sort direction '{word}', expected 'asc' or 'desc'"
                )))
            }
        };
        if let Some(extra) = words.next() {
            return Err(invalid(format!("unexpected '{extra}' after '{name} ...'")));
        }

        let field = resolve_sortable(name).map_err(|kind| Error::new(Parameter::OrderBy, kind))?;
        if elements.iter().any(|element| element.field == field) {
            return Err(Error::new(
                Parameter::OrderBy,
                ErrorKind::DuplicateSortField(field.name),
            ));
        }
        elements.push(OrderByElement { field, direction });
    }
    Ok(elements)
}

fn resolve_sortable(name: &str) -> Result<FieldDescriptor, ErrorKind> {
    let field = metadata::resolve(name)?;
    if field.sortable {
        Ok(field)
    } else {
        Err(ErrorKind::NotSortable(field.name))
    }
}

/// Convert the requested ordering to a SQL ORDER BY clause.
///
/// The primary key columns follow as tie-breakers, so pages are stable.
pub fn translate_order_by(elements: &[OrderByElement]) -> sql::ast::OrderBy {
    let tie_breakers = Column::PRIMARY_KEY
        .into_iter()
        .map(Column::descriptor)
        .filter(|key| !elements.iter().any(|element| element.field == *key))
        .map(|field| OrderByElement {
            field,
            direction: Direction::Asc,
        })
        .collect::<Vec<_>>();

    sql::ast::OrderBy {
        elements: elements
            .iter()
            .chain(&tie_breakers)
            .map(|element| sql::ast::OrderByElement {
                target: translate_field(&element.field),
                direction: match element.direction {
                    Direction::Asc => sql::ast::OrderByDirection::Asc,
                    Direction::Desc => sql::ast::OrderByDirection::Desc,
                },
            })
            .collect(),
    }
}
