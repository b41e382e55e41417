//! Driver's license entity models and DTOs.

use govsync_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_licenses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserLicense {
    pub id: DbId,
    pub user_id: String,
    pub state: String,
    pub license_number: String,
    pub license_type: String,
    pub expiration_date: String,
    pub restrictions: serde_json::Value,
    pub endorsements: serde_json::Value,
    pub disability_accommodations: serde_json::Value,
    pub real_id_compliant: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting a license from a fresh DMV payload.
#[derive(Debug)]
pub struct NewUserLicense<'a> {
    pub state: &'a str,
    pub license_number: &'a str,
    pub license_type: &'a str,
    pub expiration_date: &'a str,
    pub restrictions: serde_json::Value,
    pub endorsements: serde_json::Value,
    pub disability_accommodations: serde_json::Value,
    pub real_id_compliant: bool,
}

/// A row from the `license_renewals` table (append-only).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LicenseRenewal {
    pub id: DbId,
    pub user_id: String,
    pub state: String,
    pub renewal_date: Timestamp,
    pub new_expiration_date: Option<String>,
    pub confirmation_number: Option<String>,
    pub status: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `accommodation_requests` table (append-only).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccommodationRequest {
    pub id: DbId,
    pub user_id: String,
    pub service: String,
    pub state: Option<String>,
    pub request_type: String,
    pub accommodations: serde_json::Value,
    pub status: Option<String>,
    pub confirmation_number: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
