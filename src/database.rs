use crate::error::StoreError;
use crate::search::store::SearchPersistence;
use async_trait::async_trait;
use sqlx::postgres::PgPool;

pub async fn init_db(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Run migrations using sqlx::migrate! macro (recommended by Shuttle)
    sqlx::migrate!().run(pool).await?;
    Ok(())
}

/// Search state persisted in the `search_state` key/value table
#[derive(Clone)]
pub struct PgPersistence {
    pool: PgPool,
}

impl PgPersistence {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchPersistence for PgPersistence {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM search_state WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO search_state (key, value, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
