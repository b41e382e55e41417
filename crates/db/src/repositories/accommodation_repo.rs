//! Repositories for the `accommodation_requests` and `license_renewals`
//! tables. Both are append-only audit trails of mutating DMV operations.

use sqlx::PgPool;

use crate::models::license::{AccommodationRequest, LicenseRenewal};

/// Column list for `accommodation_requests` queries.
const REQUEST_COLUMNS: &str = "id, user_id, service, state, request_type, accommodations, \
    status, confirmation_number, created_at, updated_at";

/// Column list for `license_renewals` queries.
const RENEWAL_COLUMNS: &str = "id, user_id, state, renewal_date, new_expiration_date, \
    confirmation_number, status, created_at, updated_at";

/// Provides storage for accommodation request records.
pub struct AccommodationRequestRepo;

impl AccommodationRequestRepo {
    /// Append an accommodation request record.
    pub async fn insert(
        pool: &PgPool,
        user_id: &str,
        service: &str,
        state: Option<&str>,
        request_type: &str,
        accommodations: &serde_json::Value,
        status: Option<&str>,
        confirmation_number: Option<&str>,
    ) -> Result<AccommodationRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO accommodation_requests \
                (user_id, service, state, request_type, accommodations, status, confirmation_number) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, AccommodationRequest>(&query)
            .bind(user_id)
            .bind(service)
            .bind(state)
            .bind(request_type)
            .bind(accommodations)
            .bind(status)
            .bind(confirmation_number)
            .fetch_one(pool)
            .await
    }

    /// List requests for a user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<AccommodationRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {REQUEST_COLUMNS} FROM accommodation_requests \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, AccommodationRequest>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}

/// Provides storage for license renewal records.
pub struct LicenseRenewalRepo;

impl LicenseRenewalRepo {
    /// Append a license renewal record.
    pub async fn insert(
        pool: &PgPool,
        user_id: &str,
        state: &str,
        new_expiration_date: Option<&str>,
        confirmation_number: Option<&str>,
        status: Option<&str>,
    ) -> Result<LicenseRenewal, sqlx::Error> {
        let query = format!(
            "INSERT INTO license_renewals \
                (user_id, state, renewal_date, new_expiration_date, confirmation_number, status) \
             VALUES ($1, $2, NOW(), $3, $4, $5) \
             RETURNING {RENEWAL_COLUMNS}"
        );
        sqlx::query_as::<_, LicenseRenewal>(&query)
            .bind(user_id)
            .bind(state)
            .bind(new_expiration_date)
            .bind(confirmation_number)
            .bind(status)
            .fetch_one(pool)
            .await
    }
}
