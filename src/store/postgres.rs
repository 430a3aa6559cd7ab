use async_trait::async_trait;
use sqlx::PgPool;

use super::{StatusStore, StoreError};

pub struct PgStatusStore {
    pool: PgPool,
    namespace: String,
}

impl PgStatusStore {
    pub fn new(pool: PgPool, namespace: &str) -> Self {
        Self {
            pool,
            namespace: namespace.to_string(),
        }
    }
}

#[async_trait]
impl StatusStore for PgStatusStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let value = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT value FROM kv_blobs WHERE namespace = $1 AND key = $2",
        )
        .bind(&self.namespace)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv_blobs (namespace, key, value)
             VALUES ($1, $2, $3)
             ON CONFLICT (namespace, key)
             DO UPDATE SET value = EXCLUDED.value, updated_at = now()",
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(&value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
