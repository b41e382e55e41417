//! Sync orchestrator bookkeeping rows.

use govsync_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `government_sync_status` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GovernmentSyncStatus {
    pub id: DbId,
    pub user_id: String,
    /// JSON array of service names included in the last sync.
    pub services: serde_json::Value,
    pub last_sync_at: Timestamp,
    pub success: bool,
    pub next_sync_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
