//! Build the data and count SELECTs of a query plan.

use query_engine_metadata::metadata::TABLE_NAME;
use query_engine_sql::sql;

use super::fields;
use super::filtering;
use super::plan::QueryPlan;
use super::sorting;

/// Translate the row retrieval part of a plan to sql ast.
pub fn translate_rows_query(plan: &QueryPlan) -> sql::ast::Select {
    let mut select = sql::helpers::simple_select(
        fields::translate_select_list(plan.select.as_deref()),
        from_table(),
    );
    select.where_ = translate_where(plan);
    select.order_by = sorting::translate_order_by(&plan.order_by);
    select.limit = sql::ast::Limit {
        limit: plan.top,
        offset: plan.skip,
    };
    select
}

/// Translate the total of a plan to sql ast. Paging and ordering do not apply.
pub fn translate_count_query(plan: &QueryPlan) -> sql::ast::Select {
    sql::helpers::count_select(from_table(), translate_where(plan))
}

fn from_table() -> sql::ast::From {
    sql::ast::From::Table {
        reference: sql::helpers::table_reference(TABLE_NAME),
    }
}

fn translate_where(plan: &QueryPlan) -> sql::ast::Where {
    sql::ast::Where(match &plan.filter {
        None => sql::helpers::empty_where(),
        Some(filter) => filtering::translate_expression(filter),
    })
}
