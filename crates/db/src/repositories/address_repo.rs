//! Repositories for `validated_addresses`, `address_changes`, and
//! `package_tracking`.

use sqlx::PgPool;

use crate::models::address::{AddressChange, PackageTracking, ValidatedAddress};

/// Column list for `validated_addresses` queries.
const ADDRESS_COLUMNS: &str = "id, user_id, original_address, standardized_address, is_valid, \
    delivery_point, zip_plus_4, created_at, updated_at";

/// Column list for `address_changes` queries.
const CHANGE_COLUMNS: &str = "id, user_id, old_address, new_address, effective_date, \
    confirmation_number, status, created_at, updated_at";

/// Column list for `package_tracking` queries.
const TRACKING_COLUMNS: &str = "id, user_id, tracking_number, status, location, \
    estimated_delivery, last_updated, created_at, updated_at";

/// Provides storage for standardized address records.
pub struct ValidatedAddressRepo;

impl ValidatedAddressRepo {
    /// Upsert a validation result on `(user_id, original_address)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        original_address: &str,
        standardized_address: Option<&str>,
        is_valid: bool,
        delivery_point: Option<&str>,
        zip_plus_4: Option<&str>,
    ) -> Result<ValidatedAddress, sqlx::Error> {
        let query = format!(
            "INSERT INTO validated_addresses \
                (user_id, original_address, standardized_address, is_valid, \
                 delivery_point, zip_plus_4) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id, original_address) DO UPDATE SET \
                standardized_address = EXCLUDED.standardized_address, \
                is_valid = EXCLUDED.is_valid, \
                delivery_point = EXCLUDED.delivery_point, \
                zip_plus_4 = EXCLUDED.zip_plus_4, \
                updated_at = NOW() \
             RETURNING {ADDRESS_COLUMNS}"
        );
        sqlx::query_as::<_, ValidatedAddress>(&query)
            .bind(user_id)
            .bind(original_address)
            .bind(standardized_address)
            .bind(is_valid)
            .bind(delivery_point)
            .bind(zip_plus_4)
            .fetch_one(pool)
            .await
    }
}

/// Provides storage for change-of-address records.
pub struct AddressChangeRepo;

impl AddressChangeRepo {
    /// Append a change-of-address record.
    pub async fn insert(
        pool: &PgPool,
        user_id: &str,
        old_address: &str,
        new_address: &str,
        effective_date: &str,
        confirmation_number: Option<&str>,
        status: Option<&str>,
    ) -> Result<AddressChange, sqlx::Error> {
        let query = format!(
            "INSERT INTO address_changes \
                (user_id, old_address, new_address, effective_date, confirmation_number, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {CHANGE_COLUMNS}"
        );
        sqlx::query_as::<_, AddressChange>(&query)
            .bind(user_id)
            .bind(old_address)
            .bind(new_address)
            .bind(effective_date)
            .bind(confirmation_number)
            .bind(status)
            .fetch_one(pool)
            .await
    }
}

/// Provides storage for package tracking snapshots.
pub struct PackageTrackingRepo;

impl PackageTrackingRepo {
    /// Upsert a tracking snapshot on `(user_id, tracking_number)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        tracking_number: &str,
        status: Option<&str>,
        location: Option<&str>,
        estimated_delivery: Option<&str>,
        last_updated: Option<&str>,
    ) -> Result<PackageTracking, sqlx::Error> {
        let query = format!(
            "INSERT INTO package_tracking \
                (user_id, tracking_number, status, location, estimated_delivery, last_updated) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id, tracking_number) DO UPDATE SET \
                status = EXCLUDED.status, \
                location = EXCLUDED.location, \
                estimated_delivery = EXCLUDED.estimated_delivery, \
                last_updated = EXCLUDED.last_updated, \
                updated_at = NOW() \
             RETURNING {TRACKING_COLUMNS}"
        );
        sqlx::query_as::<_, PackageTracking>(&query)
            .bind(user_id)
            .bind(tracking_number)
            .bind(status)
            .bind(location)
            .bind(estimated_delivery)
            .bind(last_updated)
            .fetch_one(pool)
            .await
    }
}
