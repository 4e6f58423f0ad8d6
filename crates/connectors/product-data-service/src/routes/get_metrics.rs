use axum::extract::State;
use prometheus::{Encoder, TextEncoder};

use crate::{error::ServerError, state::ServerState};

/// Prometheus text exposition of every registered metric.
pub async fn get_metrics(State(state): State<ServerState>) -> Result<String, ServerError> {
    state.metrics.update_pool_metrics(&state.pool);

    let encoder = TextEncoder::new();
    let mut buffer = vec![];
    encoder
        .encode(&state.registry.gather(), &mut buffer)
        .map_err(|err| {
            tracing::error!(error = %err, "could not encode metrics");
            ServerError::Internal(err.to_string())
        })?;
    String::from_utf8(buffer).map_err(|err| {
        tracing::error!(error = %err, "metrics are not valid utf-8");
        ServerError::Internal(err.to_string())
    })
}
