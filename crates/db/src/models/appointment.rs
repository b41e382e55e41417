//! Appointment rows persisted after successful scheduling calls.

use govsync_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_appointments` table (append-only).
///
/// `state` is set only for DMV appointments; federal agencies have none.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserAppointment {
    pub id: DbId,
    pub user_id: String,
    pub service: String,
    pub state: Option<String>,
    pub appointment_type: String,
    pub scheduled_date: Option<String>,
    pub confirmation_number: Option<String>,
    pub accommodations: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
