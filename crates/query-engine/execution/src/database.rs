//! The database seam: run one parameterized statement on one connection.

use async_trait::async_trait;
use query_engine_sql::sql;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Column, Row as _, TypeInfo};
use tokio::time::{timeout_at, Instant};

use crate::error::{DatabaseError, DatabaseErrorKind};

/// A result row, keyed by column alias.
pub type Row = Map<String, Value>;

/// Something that can run a statement and hand back its rows.
#[async_trait]
pub trait Database: Send {
    /// Run a statement, failing with `Timeout` once `deadline` has passed.
    async fn execute(
        &mut self,
        statement: &sql::string::SQL,
        deadline: Instant,
    ) -> Result<Vec<Row>, DatabaseError>;
}

#[async_trait]
impl Database for sqlx::PgConnection {
    async fn execute(
        &mut self,
        statement: &sql::string::SQL,
        deadline: Instant,
    ) -> Result<Vec<Row>, DatabaseError> {
        let query = build_query_with_params(statement);
        let rows = timeout_at(deadline, query.fetch_all(&mut *self))
            .await
            .map_err(|_| DatabaseError::timeout())??;
        rows.iter().map(decode_row).collect()
    }
}

/// Take a connection from the pool, waiting no longer than `deadline`.
///
/// The connection goes back to the pool when it is dropped.
pub async fn acquire(
    pool: &sqlx::PgPool,
    deadline: Instant,
) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, DatabaseError> {
    Ok(timeout_at(deadline, pool.acquire())
        .await
        .map_err(|_| DatabaseError::timeout())??)
}

/// Create a SQLx query based on our SQL query and bind our parameters to it.
fn build_query_with_params(
    query: &sql::string::SQL,
) -> sqlx::query::Query<'_, sqlx::Postgres, PgArguments> {
    let sqlx_query = sqlx::query(query.sql.as_str());

    query
        .params
        .iter()
        .fold(sqlx_query, |sqlx_query, param| match param {
            sql::string::Param::String(s) => sqlx_query.bind(s),
            sql::string::Param::Float8(f) => sqlx_query.bind(*f),
            sql::string::Param::Bool(b) => sqlx_query.bind(*b),
        })
}

/// Convert a postgres row into a JSON object keyed by column name.
fn decode_row(row: &PgRow) -> Result<Row, DatabaseError> {
    row.columns()
        .iter()
        .map(|column| {
            let index = column.ordinal();
            let value = match column.type_info().name() {
                "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
                    row.try_get::<Option<String>, _>(index)?.map(Value::String)
                }
                "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index)?,
                "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
                "INT4" => row.try_get::<Option<i32>, _>(index)?.map(Value::from),
                "FLOAT8" => row
                    .try_get::<Option<f64>, _>(index)?
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number),
                "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::Bool),
                other => {
                    return Err(DatabaseError::new(
                        DatabaseErrorKind::Unknown,
                        format!("column '{}' has unsupported type {other}", column.name()),
                    ))
                }
            };
            Ok((column.name().to_string(), value.unwrap_or(Value::Null)))
        })
        .collect()
}
