//! Repositories for the `user_tax_credits` and `user_medical_deductions`
//! tables.

use sqlx::PgPool;

use crate::models::tax::{UserMedicalDeduction, UserTaxCredit};

/// Column list for `user_tax_credits` queries.
const CREDIT_COLUMNS: &str = "id, user_id, credit_type, amount, tax_year, eligibility_reason, \
    source, created_at, updated_at";

/// Column list for `user_medical_deductions` queries.
const DEDUCTION_COLUMNS: &str =
    "id, user_id, category, amount, description, tax_year, source, created_at, updated_at";

/// Provides storage for disability tax credit records.
pub struct TaxCreditRepo;

impl TaxCreditRepo {
    /// Upsert a credit on its natural key `(user_id, credit_type, tax_year)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        credit_type: &str,
        amount: f64,
        tax_year: i32,
        eligibility_reason: Option<&str>,
        source: &str,
    ) -> Result<UserTaxCredit, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_tax_credits \
                (user_id, credit_type, amount, tax_year, eligibility_reason, source) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id, credit_type, tax_year) DO UPDATE SET \
                amount = EXCLUDED.amount, \
                eligibility_reason = EXCLUDED.eligibility_reason, \
                updated_at = NOW() \
             RETURNING {CREDIT_COLUMNS}"
        );
        sqlx::query_as::<_, UserTaxCredit>(&query)
            .bind(user_id)
            .bind(credit_type)
            .bind(amount)
            .bind(tax_year)
            .bind(eligibility_reason)
            .bind(source)
            .fetch_one(pool)
            .await
    }

    /// List credits for a user and tax year.
    pub async fn list_for_year(
        pool: &PgPool,
        user_id: &str,
        tax_year: i32,
    ) -> Result<Vec<UserTaxCredit>, sqlx::Error> {
        let query = format!(
            "SELECT {CREDIT_COLUMNS} FROM user_tax_credits \
             WHERE user_id = $1 AND tax_year = $2 ORDER BY credit_type"
        );
        sqlx::query_as::<_, UserTaxCredit>(&query)
            .bind(user_id)
            .bind(tax_year)
            .fetch_all(pool)
            .await
    }
}

/// Provides storage for medical deduction records.
pub struct MedicalDeductionRepo;

impl MedicalDeductionRepo {
    /// Upsert a deduction on its natural key `(user_id, category, tax_year)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        category: &str,
        amount: f64,
        description: Option<&str>,
        tax_year: i32,
        source: &str,
    ) -> Result<UserMedicalDeduction, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_medical_deductions \
                (user_id, category, amount, description, tax_year, source) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id, category, tax_year) DO UPDATE SET \
                amount = EXCLUDED.amount, \
                description = EXCLUDED.description, \
                updated_at = NOW() \
             RETURNING {DEDUCTION_COLUMNS}"
        );
        sqlx::query_as::<_, UserMedicalDeduction>(&query)
            .bind(user_id)
            .bind(category)
            .bind(amount)
            .bind(description)
            .bind(tax_year)
            .bind(source)
            .fetch_one(pool)
            .await
    }

    /// List deductions for a user and tax year.
    pub async fn list_for_year(
        pool: &PgPool,
        user_id: &str,
        tax_year: i32,
    ) -> Result<Vec<UserMedicalDeduction>, sqlx::Error> {
        let query = format!(
            "SELECT {DEDUCTION_COLUMNS} FROM user_medical_deductions \
             WHERE user_id = $1 AND tax_year = $2 ORDER BY category"
        );
        sqlx::query_as::<_, UserMedicalDeduction>(&query)
            .bind(user_id)
            .bind(tax_year)
            .fetch_all(pool)
            .await
    }
}
