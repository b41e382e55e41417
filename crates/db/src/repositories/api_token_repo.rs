//! Repository for the `government_api_tokens` table.

use govsync_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::token::GovernmentApiToken;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, service, encrypted_token, expires_at, created_at, updated_at";

/// Provides storage for service-level OAuth credentials.
pub struct ApiTokenRepo;

impl ApiTokenRepo {
    /// Upsert the credential for a service.
    ///
    /// Each successful authentication replaces the stored token wholesale;
    /// there is never more than one row per service.
    pub async fn upsert(
        pool: &PgPool,
        service: &str,
        encrypted_token: &[u8],
        expires_at: Timestamp,
    ) -> Result<GovernmentApiToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO government_api_tokens (service, encrypted_token, expires_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (service) DO UPDATE SET \
                encrypted_token = EXCLUDED.encrypted_token, \
                expires_at = EXCLUDED.expires_at, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GovernmentApiToken>(&query)
            .bind(service)
            .bind(encrypted_token)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find the stored credential for a service, expired or not.
    pub async fn find(
        pool: &PgPool,
        service: &str,
    ) -> Result<Option<GovernmentApiToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM government_api_tokens WHERE service = $1");
        sqlx::query_as::<_, GovernmentApiToken>(&query)
            .bind(service)
            .fetch_optional(pool)
            .await
    }
}
