//! Service-level OAuth credential rows.

use govsync_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `government_api_tokens` table.
///
/// One row per service: these are service-to-service client-credentials
/// grants (the platform's own access to the agency), not per-citizen
/// delegated tokens.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GovernmentApiToken {
    pub id: DbId,
    pub service: String,
    /// AES-256-GCM ciphertext. Skipped during serialization to prevent
    /// exposure.
    #[serde(skip_serializing)]
    pub encrypted_token: Vec<u8>,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GovernmentApiToken {
    /// A credential is valid only while its expiry is in the future.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}
