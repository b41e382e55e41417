//! Repository for the `government_sync_status` table.

use sqlx::PgPool;

use crate::models::sync::GovernmentSyncStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, services, last_sync_at, success, next_sync_at, created_at, updated_at";

/// Provides storage for per-user sync bookkeeping.
pub struct SyncStatusRepo;

impl SyncStatusRepo {
    /// Record the outcome of a sync run, scheduling the next one 24 hours out.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        services: &serde_json::Value,
        success: bool,
    ) -> Result<GovernmentSyncStatus, sqlx::Error> {
        let query = format!(
            "INSERT INTO government_sync_status \
                (user_id, services, last_sync_at, success, next_sync_at) \
             VALUES ($1, $2, NOW(), $3, NOW() + INTERVAL '24 hours') \
             ON CONFLICT (user_id) DO UPDATE SET \
                services = EXCLUDED.services, \
                last_sync_at = EXCLUDED.last_sync_at, \
                success = EXCLUDED.success, \
                next_sync_at = EXCLUDED.next_sync_at, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GovernmentSyncStatus>(&query)
            .bind(user_id)
            .bind(services)
            .bind(success)
            .fetch_one(pool)
            .await
    }

    /// Get the sync status for a user.
    pub async fn get(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Option<GovernmentSyncStatus>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM government_sync_status WHERE user_id = $1");
        sqlx::query_as::<_, GovernmentSyncStatus>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
