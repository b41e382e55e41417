//! IRS tax credit and medical deduction rows.

use govsync_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_tax_credits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserTaxCredit {
    pub id: DbId,
    pub user_id: String,
    pub credit_type: String,
    pub amount: f64,
    pub tax_year: i32,
    pub eligibility_reason: Option<String>,
    pub source: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `user_medical_deductions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserMedicalDeduction {
    pub id: DbId,
    pub user_id: String,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    pub tax_year: i32,
    pub source: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
