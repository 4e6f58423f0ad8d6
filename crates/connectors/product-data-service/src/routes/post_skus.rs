use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use query_engine_execution::mutation::{upload, UploadRequest};
use serde_json::{json, Value};

use crate::{error::ServerError, state::ServerState};

/// Replace the stored product list of every SKU in the body.
pub async fn post_skus(
    State(state): State<ServerState>,
    body: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let Json(request) = body.map_err(|rejection| ServerError::InvalidBody(rejection.body_text()))?;
    request.validate()?;

    let deadline = state.deadline();
    let mut connection = state.acquire(deadline).await?;
    let results = upload(&mut connection, &state.metrics, &request, deadline).await;

    Ok((StatusCode::CREATED, Json(json!({ "results": results }))))
}
