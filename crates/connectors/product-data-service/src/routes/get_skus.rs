use axum::{
    extract::{RawQuery, State},
    Json,
};
use query_engine_execution::shape::shape;
use query_engine_translation::translation::query::translate;
use serde_json::Value;

use crate::{error::ServerError, state::ServerState};

/// Query SKU records with `$filter`, `$orderby`, `$top`, `$skip`, `$select`, `$count`
/// and `$inlinecount`.
pub async fn get_skus(
    State(state): State<ServerState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ServerError> {
    let plan = translate(query.as_deref().unwrap_or_default(), &state.translation_options)?;
    let results = state.run(&plan).await?;
    Ok(Json(shape(&results, &plan)))
}
