//! Store uploaded SKU records.
//!
//! Every SKU replaces its stored product list in its own transaction, so one failing SKU
//! does not undo the others.

use std::collections::HashSet;

use query_engine_metadata::metadata::TABLE_NAME;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::Connection;
use tokio::time::{timeout_at, Instant};

use crate::error::DatabaseError;
use crate::metrics;

/// The body of an upload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadRequest {
    pub data: Vec<SkuRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuRecord {
    pub sku: String,
    #[serde(default)]
    pub product_list: Vec<ProductEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEntry {
    pub product_id: String,
    #[serde(default = "empty_metadata")]
    pub metadata: Value,
}

fn empty_metadata() -> Value {
    Value::Object(Map::new())
}

/// An upload that is rejected before touching the database.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("data must contain at least one record")]
    NoRecords,
    #[error("record {index} has an empty sku")]
    EmptySku { index: usize },
    #[error("sku '{sku}' appears more than once")]
    DuplicateSku { sku: String },
    #[error("sku '{sku}' has a product with an empty productId")]
    EmptyProductId { sku: String },
    #[error("sku '{sku}' lists product '{product_id}' more than once")]
    DuplicateProductId { sku: String, product_id: String },
    #[error("metadata of product '{product_id}' must be an object")]
    MetadataNotAnObject { product_id: String },
}

/// The outcome of storing one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadStatus {
    pub sku: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl UploadRequest {
    /// Check the shape of every record.
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.data.is_empty() {
            return Err(UploadError::NoRecords);
        }
        let mut skus = HashSet::new();
        for (index, record) in self.data.iter().enumerate() {
            if record.sku.trim().is_empty() {
                return Err(UploadError::EmptySku { index });
            }
            if !skus.insert(record.sku.as_str()) {
                return Err(UploadError::DuplicateSku {
                    sku: record.sku.clone(),
                });
            }
            let mut product_ids = HashSet::new();
            for product in &record.product_list {
                if product.product_id.trim().is_empty() {
                    return Err(UploadError::EmptyProductId {
                        sku: record.sku.clone(),
                    });
                }
                if !product_ids.insert(product.product_id.as_str()) {
                    return Err(UploadError::DuplicateProductId {
                        sku: record.sku.clone(),
                        product_id: product.product_id.clone(),
                    });
                }
                if !product.metadata.is_object() {
                    return Err(UploadError::MetadataNotAnObject {
                        product_id: product.product_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Store every record of a validated upload, reporting per SKU.
pub async fn upload(
    connection: &mut sqlx::PgConnection,
    metrics: &metrics::Metrics,
    request: &UploadRequest,
    deadline: Instant,
) -> Vec<UploadStatus> {
    let mut statuses = Vec::with_capacity(request.data.len());
    for record in &request.data {
        let status = match replace_sku(connection, record, deadline).await {
            Ok(()) => {
                metrics.upload_total.inc();
                UploadStatus {
                    sku: record.sku.clone(),
                    status: Status::Success,
                    error: None,
                }
            }
            Err(err) => {
                metrics.record_error(err.kind);
                tracing::error!(
                    sku = %record.sku,
                    kind = err.kind.label(),
                    error = %err.message,
                    "storing sku failed"
                );
                UploadStatus {
                    sku: record.sku.clone(),
                    status: Status::Error,
                    error: Some(format!("could not store sku ({})", err.kind.label())),
                }
            }
        };
        statuses.push(status);
    }
    statuses
}

/// Replace the stored product list of one SKU.
async fn replace_sku(
    connection: &mut sqlx::PgConnection,
    record: &SkuRecord,
    deadline: Instant,
) -> Result<(), DatabaseError> {
    timeout_at(deadline, async {
        let delete = format!(r#"DELETE FROM "{TABLE_NAME}" WHERE "sku" = $1"#);
        let insert = format!(
            r#"INSERT INTO "{TABLE_NAME}" ("sku", "product_id", "metadata") VALUES ($1, $2, $3)"#
        );

        let mut transaction = connection.begin().await?;
        sqlx::query(&delete)
            .bind(&record.sku)
            .execute(&mut *transaction)
            .await?;
        for product in &record.product_list {
            sqlx::query(&insert)
                .bind(&record.sku)
                .bind(&product.product_id)
                .bind(sqlx::types::Json(&product.metadata))
                .execute(&mut *transaction)
                .await?;
        }
        transaction.commit().await?;
        Ok::<(), sqlx::Error>(())
    })
    .await
    .map_err(|_| DatabaseError::timeout())?
    .map_err(DatabaseError::from)
}
