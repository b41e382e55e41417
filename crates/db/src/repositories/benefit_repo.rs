//! Repositories for `user_benefit_history`, `user_disability_status`,
//! and `user_work_credits`.

use sqlx::PgPool;

use crate::models::benefit::{UserBenefitHistory, UserDisabilityStatus, UserWorkCredits};

/// Column list for `user_benefit_history` queries.
const HISTORY_COLUMNS: &str = "id, user_id, benefit_type, monthly_amount, effective_date, \
    source, created_at, updated_at";

/// Column list for `user_disability_status` queries.
const STATUS_COLUMNS: &str = "id, user_id, determination_date, disability_type, review_date, \
    source, created_at, updated_at";

/// Column list for `user_work_credits` queries.
const CREDITS_COLUMNS: &str = "id, user_id, total_credits, credits_needed, last_work_year, \
    source, created_at, updated_at";

/// Provides storage for benefit history records.
pub struct BenefitHistoryRepo;

impl BenefitHistoryRepo {
    /// Upsert a history entry on `(user_id, benefit_type, effective_date)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        benefit_type: &str,
        monthly_amount: f64,
        effective_date: &str,
        source: &str,
    ) -> Result<UserBenefitHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_benefit_history \
                (user_id, benefit_type, monthly_amount, effective_date, source) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, benefit_type, effective_date) DO UPDATE SET \
                monthly_amount = EXCLUDED.monthly_amount, \
                updated_at = NOW() \
             RETURNING {HISTORY_COLUMNS}"
        );
        sqlx::query_as::<_, UserBenefitHistory>(&query)
            .bind(user_id)
            .bind(benefit_type)
            .bind(monthly_amount)
            .bind(effective_date)
            .bind(source)
            .fetch_one(pool)
            .await
    }
}

/// Provides storage for disability determination records.
pub struct DisabilityStatusRepo;

impl DisabilityStatusRepo {
    /// Upsert the determination for a user on `(user_id, source)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        determination_date: Option<&str>,
        disability_type: Option<&str>,
        review_date: Option<&str>,
        source: &str,
    ) -> Result<UserDisabilityStatus, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_disability_status \
                (user_id, determination_date, disability_type, review_date, source) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, source) DO UPDATE SET \
                determination_date = EXCLUDED.determination_date, \
                disability_type = EXCLUDED.disability_type, \
                review_date = EXCLUDED.review_date, \
                updated_at = NOW() \
             RETURNING {STATUS_COLUMNS}"
        );
        sqlx::query_as::<_, UserDisabilityStatus>(&query)
            .bind(user_id)
            .bind(determination_date)
            .bind(disability_type)
            .bind(review_date)
            .bind(source)
            .fetch_one(pool)
            .await
    }
}

/// Provides storage for work credit records.
pub struct WorkCreditsRepo;

impl WorkCreditsRepo {
    /// Upsert the credit totals for a user on `(user_id, source)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        total_credits: i32,
        credits_needed: Option<i32>,
        last_work_year: Option<i32>,
        source: &str,
    ) -> Result<UserWorkCredits, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_work_credits \
                (user_id, total_credits, credits_needed, last_work_year, source) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, source) DO UPDATE SET \
                total_credits = EXCLUDED.total_credits, \
                credits_needed = EXCLUDED.credits_needed, \
                last_work_year = EXCLUDED.last_work_year, \
                updated_at = NOW() \
             RETURNING {CREDITS_COLUMNS}"
        );
        sqlx::query_as::<_, UserWorkCredits>(&query)
            .bind(user_id)
            .bind(total_credits)
            .bind(credits_needed)
            .bind(last_work_year)
            .bind(source)
            .fetch_one(pool)
            .await
    }
}
