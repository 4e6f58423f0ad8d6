//! Metadata information regarding the database table that backs SKU records.

use enum_iterator::Sequence;
use query_engine_sql::sql::ast::JsonKey;
use serde::{Deserialize, Serialize};

/// The table holding one row per product entry.
pub const TABLE_NAME: &str = "sku_products";

/// The scalar types a field or a filter literal can have.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Number,
    Boolean,
    /// A whole JSON object. Only ever projected, never compared.
    Json,
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarType::String => write!(f, "string"),
            ScalarType::Number => write!(f, "number"),
            ScalarType::Boolean => write!(f, "boolean"),
            ScalarType::Json => write!(f, "json"),
        }
    }
}

/// The columns of the `sku_products` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence)]
pub enum Column {
    Sku,
    ProductId,
    Metadata,
}

impl Column {
    /// The primary key of the table, in tie-breaking order.
    pub const PRIMARY_KEY: [Column; 2] = [Column::Sku, Column::ProductId];

    /// The column name in the database.
    pub fn name(self) -> &'static str {
        match self {
            Column::Sku => "sku",
            Column::ProductId => "product_id",
            Column::Metadata => "metadata",
        }
    }

    /// The type of the values stored in the column.
    pub fn scalar_type(self) -> ScalarType {
        match self {
            Column::Sku | Column::ProductId => ScalarType::String,
            Column::Metadata => ScalarType::Json,
        }
    }
}

/// Where the value of a field lives in the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlPath {
    /// A plain column.
    Column(Column),
    /// A text value extracted from a JSON column by key.
    JsonKey { column: Column, key: JsonKey },
}

impl SqlPath {
    /// The column the path reads from.
    pub fn column(&self) -> Column {
        match self {
            SqlPath::Column(column) | SqlPath::JsonKey { column, .. } => *column,
        }
    }
}
