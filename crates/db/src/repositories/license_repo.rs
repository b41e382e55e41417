//! Repository for the `user_licenses` table.

use sqlx::PgPool;

use crate::models::license::{NewUserLicense, UserLicense};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, state, license_number, license_type, expiration_date, \
    restrictions, endorsements, disability_accommodations, real_id_compliant, \
    created_at, updated_at";

/// Provides storage for driver's license records.
pub struct LicenseRepo;

impl LicenseRepo {
    /// Upsert a license on its natural key `(user_id, state, license_number)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        license: &NewUserLicense<'_>,
    ) -> Result<UserLicense, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_licenses \
                (user_id, state, license_number, license_type, expiration_date, \
                 restrictions, endorsements, disability_accommodations, real_id_compliant) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (user_id, state, license_number) DO UPDATE SET \
                license_type = EXCLUDED.license_type, \
                expiration_date = EXCLUDED.expiration_date, \
                restrictions = EXCLUDED.restrictions, \
                endorsements = EXCLUDED.endorsements, \
                disability_accommodations = EXCLUDED.disability_accommodations, \
                real_id_compliant = EXCLUDED.real_id_compliant, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserLicense>(&query)
            .bind(user_id)
            .bind(license.state)
            .bind(license.license_number)
            .bind(license.license_type)
            .bind(license.expiration_date)
            .bind(&license.restrictions)
            .bind(&license.endorsements)
            .bind(&license.disability_accommodations)
            .bind(license.real_id_compliant)
            .fetch_one(pool)
            .await
    }

    /// List all licenses for a user, newest state first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<UserLicense>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_licenses WHERE user_id = $1 ORDER BY state, license_number"
        );
        sqlx::query_as::<_, UserLicense>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
