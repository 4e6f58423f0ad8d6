//! Translate an incoming query string.

pub mod counting;
pub mod fields;
pub mod filtering;
pub mod paging;
pub mod parameters;
pub mod plan;
pub mod root;
pub mod sorting;
pub mod values;

use query_engine_sql::sql;

use crate::translation::error::{Error, Parameter};
use crate::translation::filter;
use parameters::RawParameters;
pub use plan::{Direction, OrderByElement, QueryPlan};

/// Limits applied while translating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// `$top` values above this are clamped to it.
    pub max_top: u32,
}

impl Default for Options {
    fn default() -> Self {
        Options { max_top: 10_000 }
    }
}

/// Validate a raw query string and build the plan it describes.
pub fn translate(raw_query: &str, options: &Options) -> Result<QueryPlan, Error> {
    let raw = RawParameters::parse(raw_query)?;

    let filter = raw
        .filter
        .as_deref()
        .map(|text| {
            let parsed =
                filter::parse(text).map_err(|err| Error::new(Parameter::Filter, err))?;
            filtering::resolve_filter(parsed)
        })
        .transpose()?;
    let order_by = match raw.order_by.as_deref() {
        None => vec![],
        Some(text) => sorting::parse_order_by(text)?,
    };
    let top = raw
        .top
        .as_deref()
        .map(|text| paging::parse_top(text, options.max_top))
        .transpose()?;
    let skip = raw.skip.as_deref().map(paging::parse_skip).transpose()?;
    let select = match raw.select.as_deref() {
        None => None,
        Some(text) => fields::parse_select(text)?,
    };
    let want_count = match raw.count.as_deref() {
        None => false,
        Some(text) => counting::parse_count(text)?,
    };
    let inline_count = match raw.inline_count.as_deref() {
        None => false,
        Some(text) => counting::parse_inline_count(text)?,
    };

    let plan = QueryPlan {
        filter,
        order_by,
        top,
        skip,
        select,
        want_count,
        inline_count,
    };
    tracing::debug!(plan = ?plan, "translated query");
    Ok(plan)
}

/// Lower a plan into the statements that answer it.
pub fn compile(plan: &QueryPlan) -> sql::execution_plan::ExecutionPlan {
    let count = plan
        .returns_count()
        .then(|| sql::convert::select_to_sql(&root::translate_count_query(plan)));
    let data = plan
        .returns_rows()
        .then(|| sql::convert::select_to_sql(&root::translate_rows_query(plan)));

    for statement in count.iter().chain(data.iter()) {
        tracing::debug!(
            generated_sql = %statement.sql,
            params = ?statement.params,
            "compiled statement"
        );
    }

    sql::execution_plan::ExecutionPlan { count, data }
}
