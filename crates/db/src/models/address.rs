//! USPS address and package tracking rows.

use govsync_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `validated_addresses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ValidatedAddress {
    pub id: DbId,
    pub user_id: String,
    pub original_address: String,
    pub standardized_address: Option<String>,
    pub is_valid: bool,
    pub delivery_point: Option<String>,
    pub zip_plus_4: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `address_changes` table (append-only).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AddressChange {
    pub id: DbId,
    pub user_id: String,
    pub old_address: String,
    pub new_address: String,
    pub effective_date: String,
    pub confirmation_number: Option<String>,
    pub status: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `package_tracking` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PackageTracking {
    pub id: DbId,
    pub user_id: String,
    pub tracking_number: String,
    pub status: Option<String>,
    pub location: Option<String>,
    pub estimated_delivery: Option<String>,
    pub last_updated: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
