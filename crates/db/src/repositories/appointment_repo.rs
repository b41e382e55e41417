//! Repository for the `user_appointments` table.

use sqlx::PgPool;

use crate::models::appointment::UserAppointment;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, service, state, appointment_type, scheduled_date, \
    confirmation_number, accommodations, created_at, updated_at";

/// Provides storage for scheduled appointment records.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Append an appointment record for a service.
    pub async fn insert(
        pool: &PgPool,
        user_id: &str,
        service: &str,
        state: Option<&str>,
        appointment_type: &str,
        scheduled_date: Option<&str>,
        confirmation_number: Option<&str>,
        accommodations: &serde_json::Value,
    ) -> Result<UserAppointment, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_appointments \
                (user_id, service, state, appointment_type, scheduled_date, \
                 confirmation_number, accommodations) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserAppointment>(&query)
            .bind(user_id)
            .bind(service)
            .bind(state)
            .bind(appointment_type)
            .bind(scheduled_date)
            .bind(confirmation_number)
            .bind(accommodations)
            .fetch_one(pool)
            .await
    }

    /// List appointments for a user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<UserAppointment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_appointments WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, UserAppointment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
