//! Handle `$select` and the translation of fields to SQL expressions.

use query_engine_metadata::metadata::{self, Column, FieldDescriptor, SqlPath, TABLE_NAME};
use query_engine_sql::sql;

use crate::translation::error::{Error, ErrorKind, Parameter};

/// Parse `$select`. `*` selects every field and yields `None`.
pub fn parse_select(raw: &str) -> Result<Option<Vec<FieldDescriptor>>, Error> {
    let raw = raw.trim();
    if raw == "*" {
        return Ok(None);
    }

    let mut selected: Vec<FieldDescriptor> = vec![];
    for name in raw.split(',').map(str::trim) {
        if name.is_empty() {
            return Err(Error::new(
                Parameter::Select,
                ErrorKind::InvalidParameter("expected a comma separated list of fields".to_string()),
            ));
        }
        let field = metadata::resolve(name).map_err(|err| Error::new(Parameter::Select, err))?;
        if !selected.contains(&field) {
            selected.push(field);
        }
    }
    Ok(Some(selected))
}

/// The SQL expression reading a field. Metadata members read as text, for comparing
/// and sorting.
pub fn translate_field(field: &FieldDescriptor) -> sql::ast::Expression {
    let table = sql::helpers::table_reference(TABLE_NAME);
    match &field.sql_path {
        SqlPath::Column(column) => sql::helpers::make_column(table, column.name()),
        SqlPath::JsonKey { column, key } => sql::ast::Expression::JsonTextField {
            expression: Box::new(sql::helpers::make_column(table, column.name())),
            key: key.clone(),
        },
    }
}

/// The select list of the data statement, aliased by field name.
///
/// `sku` is always projected because results are grouped by it.
pub fn translate_select_list(
    select: Option<&[FieldDescriptor]>,
) -> Vec<(sql::ast::ColumnAlias, sql::ast::Expression)> {
    let defaults;
    let fields = match select {
        Some(fields) => fields,
        None => {
            defaults = metadata::default_selection();
            &defaults
        }
    };

    let sku = Column::Sku.descriptor();
    let grouping = (!fields.contains(&sku)).then_some(&sku);

    grouping
        .into_iter()
        .chain(fields)
        .map(|field| {
            (
                sql::helpers::make_column_alias(field.name.clone()),
                translate_projection(field),
            )
        })
        .collect()
}

/// The SQL expression projecting a field. Metadata members keep their JSON type.
fn translate_projection(field: &FieldDescriptor) -> sql::ast::Expression {
    match &field.sql_path {
        SqlPath::Column(_) => translate_field(field),
        SqlPath::JsonKey { column, key } => sql::ast::Expression::JsonField {
            expression: Box::new(sql::helpers::make_column(
                sql::helpers::table_reference(TABLE_NAME),
                column.name(),
            )),
            key: key.clone(),
        },
    }
}
