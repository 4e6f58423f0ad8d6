//! Bootstrap the table backing SKU records.

use query_engine_metadata::metadata::TABLE_NAME;

use crate::error::DatabaseError;

/// The DDL of the records table.
pub fn create_table_sql() -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS "{TABLE_NAME}" (
    "sku" TEXT NOT NULL,
    "product_id" TEXT NOT NULL,
    "metadata" JSONB NOT NULL DEFAULT '{{}}'::jsonb,
    PRIMARY KEY ("sku", "product_id")
)"#
    )
}

/// Create the records table unless it exists already.
pub async fn create_table(pool: &sqlx::PgPool) -> Result<(), DatabaseError> {
    sqlx::query(&create_table_sql()).execute(pool).await?;
    tracing::info!(table = TABLE_NAME, "records table is ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_matches_the_registry() {
        let ddl = create_table_sql();
        assert!(ddl.starts_with(r#"CREATE TABLE IF NOT EXISTS "sku_products""#));
        assert!(ddl.contains(r#"DEFAULT '{}'::jsonb"#));
        assert!(ddl.contains(r#"PRIMARY KEY ("sku", "product_id")"#));
    }
}
