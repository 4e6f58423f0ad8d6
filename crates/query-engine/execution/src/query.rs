//! Execute an execution plan against the database.

use query_engine_sql::sql;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{info_span, Instrument};

use crate::database::{Database, Row};
use crate::error::{DatabaseError, DatabaseErrorKind};
use crate::metrics;

/// What the database returned for a plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResults {
    pub rows: Vec<Row>,
    /// Present when the plan had a count statement.
    pub count: Option<u64>,
}

/// Run the count statement and then the data statement of a plan on one connection.
pub async fn execute<D: Database + ?Sized>(
    database: &mut D,
    metrics: &metrics::Metrics,
    plan: &sql::execution_plan::ExecutionPlan,
    deadline: Instant,
) -> Result<QueryResults, DatabaseError> {
    let timer = metrics.query_duration.start_timer();
    let result = run(database, plan, deadline).await;
    timer.observe_duration();

    match &result {
        Ok(_) => metrics.query_total.inc(),
        Err(err) => {
            metrics.record_error(err.kind);
            tracing::error!(kind = err.kind.label(), error = %err.message, "query failed");
        }
    }
    result
}

async fn run<D: Database + ?Sized>(
    database: &mut D,
    plan: &sql::execution_plan::ExecutionPlan,
    deadline: Instant,
) -> Result<QueryResults, DatabaseError> {
    let count = match &plan.count {
        None => None,
        Some(statement) => {
            log_statement(statement);
            let rows = database
                .execute(statement, deadline)
                .instrument(info_span!("Count"))
                .await?;
            Some(read_count(&rows)?)
        }
    };

    let rows = match &plan.data {
        None => vec![],
        Some(statement) => {
            log_statement(statement);
            database
                .execute(statement, deadline)
                .instrument(info_span!("Rows"))
                .await?
        }
    };

    Ok(QueryResults { rows, count })
}

/// The total out of the single row of a count statement.
fn read_count(rows: &[Row]) -> Result<u64, DatabaseError> {
    rows.first()
        .and_then(|row| row.get("count"))
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            DatabaseError::new(
                DatabaseErrorKind::Unknown,
                "count statement did not return a count",
            )
        })
}

fn log_statement(statement: &sql::string::SQL) {
    tracing::debug!(
        params = ?statement.params,
        "running statement\n{}",
        sqlformat::format(
            &statement.sql,
            &sqlformat::QueryParams::None,
            sqlformat::FormatOptions::default(),
        )
    );
}
