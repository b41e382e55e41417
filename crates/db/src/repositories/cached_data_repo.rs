//! Repository for the `cached_government_data` table.

use std::time::Duration;

use sqlx::PgPool;

use crate::models::cache::CachedGovernmentData;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, service, data_type, data, cached_at, expires_at, created_at, updated_at";

/// Write-through cache of raw agency payloads.
pub struct CachedDataRepo;

impl CachedDataRepo {
    /// Upsert a cache entry, resetting `cached_at` and `expires_at`.
    ///
    /// Exactly one live row exists per `(user_id, service, data_type)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        service: &str,
        data_type: &str,
        data: &serde_json::Value,
        ttl: Duration,
    ) -> Result<CachedGovernmentData, sqlx::Error> {
        let query = format!(
            "INSERT INTO cached_government_data \
                (user_id, service, data_type, data, cached_at, expires_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW() + make_interval(secs => $5)) \
             ON CONFLICT (user_id, service, data_type) DO UPDATE SET \
                data = EXCLUDED.data, \
                cached_at = EXCLUDED.cached_at, \
                expires_at = EXCLUDED.expires_at, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CachedGovernmentData>(&query)
            .bind(user_id)
            .bind(service)
            .bind(data_type)
            .bind(data)
            .bind(ttl.as_secs_f64())
            .fetch_one(pool)
            .await
    }

    /// Get a cache entry only if it has not expired.
    ///
    /// An expired row is indistinguishable from no row at all.
    pub async fn get_fresh(
        pool: &PgPool,
        user_id: &str,
        service: &str,
        data_type: &str,
    ) -> Result<Option<CachedGovernmentData>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cached_government_data \
             WHERE user_id = $1 AND service = $2 AND data_type = $3 \
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, CachedGovernmentData>(&query)
            .bind(user_id)
            .bind(service)
            .bind(data_type)
            .fetch_optional(pool)
            .await
    }
}
