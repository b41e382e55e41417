//! SSA benefit, disability, and work-credit rows.

use govsync_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_benefit_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserBenefitHistory {
    pub id: DbId,
    pub user_id: String,
    pub benefit_type: String,
    pub monthly_amount: f64,
    pub effective_date: String,
    pub source: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `user_disability_status` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserDisabilityStatus {
    pub id: DbId,
    pub user_id: String,
    pub determination_date: Option<String>,
    pub disability_type: Option<String>,
    pub review_date: Option<String>,
    pub source: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `user_work_credits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserWorkCredits {
    pub id: DbId,
    pub user_id: String,
    pub total_credits: i32,
    pub credits_needed: Option<i32>,
    pub last_work_year: Option<i32>,
    pub source: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
