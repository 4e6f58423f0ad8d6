use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use query_engine_execution::error::DatabaseError;
use query_engine_execution::mutation::UploadError;
use query_engine_translation::translation::error::Error as TranslationError;

/// Everything a handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Translation(err) => {
                tracing::info!(parameter = err.parameter.name(), error = %err.kind, "rejected query");
                let body = json!({
                    "error": {
                        "parameter": err.parameter.name(),
                        "message": err.kind.to_string(),
                    }
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ServerError::Upload(_) | ServerError::InvalidBody(_) => {
                tracing::info!(error = %self, "rejected upload");
                let body = json!({ "error": { "message": self.to_string() } });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ServerError::NotFound(message) => {
                let body = json!({ "error": { "message": message } });
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            // The cause was logged where it happened.
            ServerError::Database(_) | ServerError::Internal(_) => {
                let body = json!({ "error": { "message": "internal error" } });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
