use query_engine_sql::sql::execution_plan::ExecutionPlan;
use query_engine_sql::sql::string::{Param, SQL};
use query_engine_translation::translation::error::Error;
use query_engine_translation::translation::query;

/// Translate and compile a raw query string with the default options.
pub fn compile(raw_query: &str) -> Result<ExecutionPlan, Error> {
    let plan = query::translate(raw_query, &query::Options::default())?;
    Ok(query::compile(&plan))
}

/// The statement and its parameters, numbered like the placeholders.
pub fn describe(statement: &SQL) -> String {
    let params: Vec<(usize, &Param)> = statement
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1, p))
        .collect();
    format!("{}\n\n{:?}", statement.sql, params)
}

pub fn string(s: &str) -> Param {
    Param::String(s.to_string())
}
