use axum::{
    extract::{Path, RawQuery, State},
    Json,
};
use query_engine_execution::shape::shape_product;
use query_engine_translation::translation::query::translate;
use serde_json::Value;

use crate::{error::ServerError, state::ServerState};

/// Look up a single product entry. Query options other than counting still apply.
pub async fn get_product(
    State(state): State<ServerState>,
    Path(product_id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ServerError> {
    let mut plan = translate(query.as_deref().unwrap_or_default(), &state.translation_options)?
        .restrict_to_product(&product_id);
    plan.want_count = false;
    plan.inline_count = false;
    plan.top = Some(1);

    let results = state.run(&plan).await?;
    shape_product(&results, &plan)
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("no product with id '{product_id}'")))
}
