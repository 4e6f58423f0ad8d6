//! Turn flat result rows back into nested SKU records.
//!
//! Rows are keyed by field name, one row per product entry. They are grouped by `sku` in
//! order of first appearance, each row becoming one element of the SKU's `productList`.

use indexmap::IndexMap;
use query_engine_metadata::metadata::{self, Column, FieldDescriptor, SqlPath};
use query_engine_translation::translation::query::QueryPlan;
use serde_json::{json, Map, Value};

use crate::database::Row;
use crate::query::QueryResults;

/// Which branches of a record the client selected.
struct Projection {
    sku: bool,
    product_id: bool,
    whole_metadata: bool,
    /// Field name and key of every selected metadata key.
    metadata_keys: Vec<(String, String)>,
}

impl Projection {
    fn new(plan: &QueryPlan) -> Projection {
        let defaults;
        let fields: &[FieldDescriptor] = match &plan.select {
            Some(fields) => fields,
            None => {
                defaults = metadata::default_selection();
                &defaults
            }
        };

        let mut projection = Projection {
            sku: false,
            product_id: false,
            whole_metadata: false,
            metadata_keys: vec![],
        };
        for field in fields {
            match &field.sql_path {
                SqlPath::Column(Column::Sku) => projection.sku = true,
                SqlPath::Column(Column::ProductId) => projection.product_id = true,
                SqlPath::Column(Column::Metadata) => projection.whole_metadata = true,
                SqlPath::JsonKey { key, .. } => projection
                    .metadata_keys
                    .push((field.name.clone(), key.as_str().to_string())),
            }
        }
        projection
    }

    fn metadata(&self) -> bool {
        self.whole_metadata || !self.metadata_keys.is_empty()
    }

    fn product(&self) -> bool {
        self.product_id || self.metadata()
    }

    /// One `productList` entry.
    fn product_entry(&self, row: &Row) -> Value {
        let mut entry = Map::new();
        if self.product_id {
            entry.insert("productId".to_string(), field(row, Column::ProductId.field_name()));
        }
        if self.metadata() {
            let mut metadata = Map::new();
            if self.whole_metadata {
                if let Some(Value::Object(whole)) = row.get(Column::Metadata.field_name()) {
                    metadata.extend(whole.clone());
                }
            }
            for (name, key) in &self.metadata_keys {
                match row.get(name) {
                    None | Some(Value::Null) => {}
                    Some(value) => {
                        metadata
                            .entry(key.clone())
                            .or_insert_with(|| value.clone());
                    }
                }
            }
            entry.insert("metadata".to_string(), Value::Object(metadata));
        }
        Value::Object(entry)
    }
}

fn field(row: &Row, name: &str) -> Value {
    row.get(name).cloned().unwrap_or(Value::Null)
}

/// Build the response payload of a `/skus` query.
pub fn shape(results: &QueryResults, plan: &QueryPlan) -> Value {
    if !plan.returns_rows() {
        return json!({ "count": results.count.unwrap_or(0) });
    }

    let projection = Projection::new(plan);

    let mut groups: IndexMap<String, (Value, Vec<Value>)> = IndexMap::new();
    for row in &results.rows {
        let sku = field(row, Column::Sku.field_name());
        let key = match &sku {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let (_, products) = groups.entry(key).or_insert_with(|| (sku, vec![]));
        if projection.product() {
            products.push(projection.product_entry(row));
        }
    }

    let records: Vec<Value> = groups
        .into_values()
        .map(|(sku, products)| {
            let mut record = Map::new();
            if projection.sku {
                record.insert("sku".to_string(), sku);
            }
            if projection.product() {
                record.insert("productList".to_string(), Value::Array(products));
            }
            Value::Object(record)
        })
        .collect();

    let mut payload = Map::new();
    payload.insert("results".to_string(), Value::Array(records));
    if let Some(count) = results.count {
        payload.insert("count".to_string(), Value::from(count));
    }
    Value::Object(payload)
}

/// Build the response payload of a `/productid/{productId}` lookup: the first matching
/// product entry, if any.
pub fn shape_product(results: &QueryResults, plan: &QueryPlan) -> Option<Value> {
    let projection = Projection::new(plan);
    results
        .rows
        .first()
        .map(|row| projection.product_entry(row))
}
