use axum::{extract::State, Json};
use query_engine_execution::database::Database;
use query_engine_sql::sql::string::SQL;
use serde_json::{json, Value};

use crate::{error::ServerError, state::ServerState};

/// Answer once the database can run a trivial statement.
pub async fn get_health(State(state): State<ServerState>) -> Result<Json<Value>, ServerError> {
    let deadline = state.deadline();
    let mut connection = state.acquire(deadline).await?;

    let mut probe = SQL::new();
    probe.append_syntax("SELECT 1");
    Database::execute(&mut *connection, &probe, deadline)
        .await
        .map_err(|err| {
            tracing::error!(kind = err.kind.label(), error = %err.message, "health check failed");
            err
        })?;

    Ok(Json(json!({})))
}
