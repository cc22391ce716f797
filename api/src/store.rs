use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use thiserror::Error;

use crate::pipeline::SparkStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Query(#[from] sqlx::Error),
}

/// Day-scoped spark cache backed by Postgres. One row per (user, day); the
/// gateway only reads and upserts through this type and never deletes rows.
#[derive(Clone)]
pub struct PgSparkStore {
    pool: PgPool,
}

impl PgSparkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Liveness probe for the health endpoint.
    pub async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[async_trait]
impl SparkStore for PgSparkStore {
    async fn fetch_spark(&self, user_id: &str, day: &str) -> Result<Option<String>, StoreError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT idea FROM daily_sparks WHERE user_id = $1 AND day = $2")
                .bind(user_id)
                .bind(day)
                .fetch_optional(&self.pool)
                .await?;

        // A row without a usable spark payload counts as a miss.
        Ok(row.and_then(|(idea,)| stored_spark(&idea)))
    }

    async fn upsert_spark(&self, user_id: &str, day: &str, spark: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO daily_sparks (user_id, day, idea) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, day) DO UPDATE SET idea = EXCLUDED.idea, updated_at = NOW()",
        )
        .bind(user_id)
        .bind(day)
        .bind(json!({ "spark": spark }))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn stored_spark(idea: &serde_json::Value) -> Option<String> {
    idea.get("spark")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|spark| !spark.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::stored_spark;
    use serde_json::json;

    #[test]
    fn usable_payload_is_returned_trimmed() {
        assert_eq!(
            stored_spark(&json!({ "spark": "  Walk dogs  " })),
            Some("Walk dogs".to_string())
        );
    }

    #[test]
    fn blank_or_malformed_payloads_are_misses() {
        assert_eq!(stored_spark(&json!({ "spark": "   " })), None);
        assert_eq!(stored_spark(&json!({ "spark": 7 })), None);
        assert_eq!(stored_spark(&json!({})), None);
        assert_eq!(stored_spark(&json!("just a string")), None);
    }
}
