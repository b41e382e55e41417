//! Cached agency response rows.

use govsync_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `cached_government_data` table.
///
/// `data` is the raw agency payload exactly as received, so a cache hit
/// goes through the same transform path as a live response.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CachedGovernmentData {
    pub id: DbId,
    pub user_id: String,
    pub service: String,
    pub data_type: String,
    pub data: serde_json::Value,
    pub cached_at: Timestamp,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
