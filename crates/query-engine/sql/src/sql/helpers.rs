//! Helpers for building sql::ast types in certain shapes and patterns.

use super::ast::*;

// Empty clauses //

/// An empty `WHERE` clause.
pub fn empty_where() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// An empty `ORDER BY` clause.
pub fn empty_order_by() -> OrderBy {
    OrderBy { elements: vec![] }
}

/// Empty `LIMIT` and `OFFSET` clauses.
pub fn empty_limit() -> Limit {
    Limit {
        limit: None,
        offset: None,
    }
}

/// A `true` expression.
pub fn true_expr() -> Expression {
    Expression::Value(Value::Bool(true))
}

// Aliasing //

/// Reference a table in the database by name.
pub fn table_reference(name: &str) -> TableReference {
    TableReference::DBTable {
        table: TableName(name.to_string()),
    }
}

/// Generate a column expression refering to a specific table.
pub fn make_column(table: TableReference, name: &str) -> Expression {
    Expression::ColumnReference(ColumnReference::TableColumn {
        table,
        name: ColumnName(name.to_string()),
    })
}

/// Create column aliases using this function so we build everything in one place.
pub fn make_column_alias(name: String) -> ColumnAlias {
    ColumnAlias { name }
}

// SELECTs //

/// Build a simple select from a table with a select list and the rest are empty.
pub fn simple_select(select_list: Vec<(ColumnAlias, Expression)>, from: From) -> Select {
    Select {
        select_list: SelectList::SelectList(select_list),
        from: Some(from),
        where_: Where(empty_where()),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// `SELECT COUNT(*) AS "count" FROM <from> WHERE <where_>`
pub fn count_select(from: From, where_: Where) -> Select {
    let mut select = simple_select(
        vec![(
            make_column_alias("count".to_string()),
            Expression::Count(CountType::Star),
        )],
        from,
    );
    select.where_ = where_;
    select
}
