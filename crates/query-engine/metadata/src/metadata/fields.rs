//! The registry of fields that may appear in `$filter`, `$orderby` and `$select`.
//!
//! Static fields map directly to columns. Any key under `productList.metadata.` resolves
//! dynamically to a text extraction from the `metadata` JSON column.

use enum_iterator::all;
use query_engine_sql::sql::ast::JsonKey;
use thiserror::Error;

use super::database::{Column, ScalarType, SqlPath};

/// Prefix of the dynamic metadata fields.
pub const METADATA_KEY_PREFIX: &str = "productList.metadata.";

/// Everything the query engine needs to know about a field a client referenced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// The name the client used, also used as the column alias in results.
    pub name: String,
    pub sql_path: SqlPath,
    pub r#type: ScalarType,
    pub filterable: bool,
    pub sortable: bool,
    /// Whether literals of another scalar type may be compared by casting the stored value.
    pub coercible: bool,
}

/// The field is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FieldDescriptor {
    /// Can a literal of the given type be compared against this field?
    pub fn accepts(&self, literal_type: ScalarType) -> bool {
        if literal_type == self.r#type {
            return true;
        }
        self.coercible && matches!(literal_type, ScalarType::Number | ScalarType::Boolean)
    }
}

impl Column {
    /// The name clients use to refer to the column.
    pub fn field_name(self) -> &'static str {
        match self {
            Column::Sku => "sku",
            Column::ProductId => "productList.productId",
            Column::Metadata => "productList.metadata",
        }
    }

    /// The descriptor of the field backed by this column.
    pub fn descriptor(self) -> FieldDescriptor {
        let comparable = self.scalar_type() != ScalarType::Json;
        FieldDescriptor {
            name: self.field_name().to_string(),
            sql_path: SqlPath::Column(self),
            r#type: self.scalar_type(),
            filterable: comparable,
            sortable: comparable,
            coercible: false,
        }
    }
}

/// Look up a field by the name a client used.
pub fn resolve(name: &str) -> Result<FieldDescriptor, UnknownField> {
    if let Some(column) = all::<Column>().find(|column| column.field_name() == name) {
        return Ok(column.descriptor());
    }
    // metadata keys end up in the query text, JsonKey only admits [A-Za-z0-9_]+
    name.strip_prefix(METADATA_KEY_PREFIX)
        .and_then(JsonKey::new)
        .map(|key| metadata_key_descriptor(name, key))
        .ok_or_else(|| UnknownField(name.to_string()))
}

/// The fields returned when a request has no `$select`.
pub fn default_selection() -> Vec<FieldDescriptor> {
    all::<Column>().map(Column::descriptor).collect()
}

fn metadata_key_descriptor(name: &str, key: JsonKey) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        sql_path: SqlPath::JsonKey {
            column: Column::Metadata,
            key,
        },
        r#type: ScalarType::String,
        filterable: true,
        sortable: true,
        coercible: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_static_fields() {
        let sku = resolve("sku").unwrap();
        assert_eq!(sku.sql_path, SqlPath::Column(Column::Sku));
        assert_eq!(sku.r#type, ScalarType::String);
        assert!(sku.filterable && sku.sortable);

        let product_id = resolve("productList.productId").unwrap();
        assert_eq!(product_id.sql_path, SqlPath::Column(Column::ProductId));
    }

    #[test]
    fn whole_metadata_is_only_selectable() {
        let metadata = resolve("productList.metadata").unwrap();
        assert_eq!(metadata.r#type, ScalarType::Json);
        assert!(!metadata.filterable);
        assert!(!metadata.sortable);
    }

    #[test]
    fn resolves_any_metadata_key() {
        let color = resolve("productList.metadata.color").unwrap();
        assert_eq!(
            color.sql_path,
            SqlPath::JsonKey {
                column: Column::Metadata,
                key: JsonKey::new("color").unwrap()
            }
        );
        assert_eq!(color.name, "productList.metadata.color");
        assert!(color.accepts(ScalarType::Number));
        assert!(color.accepts(ScalarType::Boolean));
    }

    #[test]
    fn rejects_metadata_keys_outside_the_character_class() {
        for name in [
            "productList.metadata.",
            "productList.metadata.a-b",
            "productList.metadata.color'--",
            "productList.metadata.a.b",
            "productList.metadata.colör",
        ] {
            assert_eq!(resolve(name), Err(UnknownField(name.to_string())), "{name}");
        }
    }

    #[test]
    fn rejects_unknown_fields() {
        assert_eq!(resolve("bogus"), Err(UnknownField("bogus".to_string())));
        assert!(resolve("SKU").is_err());
        assert!(resolve("product_id").is_err());
    }

    #[test]
    fn columns_do_not_coerce() {
        let sku = resolve("sku").unwrap();
        assert!(sku.accepts(ScalarType::String));
        assert!(!sku.accepts(ScalarType::Number));
        assert!(!sku.accepts(ScalarType::Boolean));
    }

    #[test]
    fn default_selection_covers_every_column() {
        let names: Vec<String> = default_selection().into_iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["sku", "productList.productId", "productList.metadata"]
        );
    }
}
