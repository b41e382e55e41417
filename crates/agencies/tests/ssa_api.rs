mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use govsync_agencies::{AgencyError, SsaClient};
use govsync_db::repositories::CachedDataRepo;
use serde_json::json;
use sqlx::PgPool;

use common::{oauth_token_route, spawn_stub, test_cipher, test_config};

const USER: &str = "user-1";
const SSN: &str = "123-45-6789";

fn benefits_payload() -> serde_json::Value {
    json!({
        "beneficiary_id": "BEN-22",
        "benefit_type": "SSDI",
        "monthly_benefit": 1450.0,
        "disability_onset_date": "2019-06-01",
        "review_date": "2026-06-01",
        "work_credits": 32,
        "medical_review_schedule": "every-3-years",
        "representative_payee": {"name": "Dana Ortiz", "relationship": "sibling"},
        "last_updated": "2024-03-10",
        "effective_date": "2020-01-01"
    })
}

async fn client_with_routes(router: Router, pool: &PgPool) -> SsaClient {
    let base_url = spawn_stub(oauth_token_route(router)).await;
    SsaClient::new(test_config(&base_url), test_cipher(), pool.clone())
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn benefits_are_cached_and_history_recorded(pool: PgPool) {
    let router = Router::new().route(
        "/beneficiary/123-45-6789/benefits",
        get(|| async { Json(benefits_payload()) }),
    );
    let client = client_with_routes(router, &pool).await;

    let benefits = client.get_benefit_information(USER, SSN).await.unwrap();
    assert_eq!(benefits.beneficiary_id, "BEN-22");
    assert_eq!(benefits.benefit_type.as_str(), "SSDI");
    assert_eq!(
        benefits.representative_payee.as_ref().unwrap().name,
        "Dana Ortiz"
    );

    let cached = CachedDataRepo::get_fresh(&pool, USER, "ssa", "benefits")
        .await
        .unwrap()
        .expect("cache row");
    assert_eq!(cached.data, benefits_payload());

    let (benefit_type, monthly_amount): (String, f64) = sqlx::query_as(
        "SELECT benefit_type, monthly_amount FROM user_benefit_history WHERE user_id = $1",
    )
    .bind(USER)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(benefit_type, "SSDI");
    assert_eq!(monthly_amount, 1450.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_beneficiary_is_not_found(pool: PgPool) {
    let router = Router::new().route(
        "/beneficiary/123-45-6789/benefits",
        get(|| async { StatusCode::NOT_FOUND }),
    );
    let client = client_with_routes(router, &pool).await;

    let err = client.get_benefit_information(USER, SSN).await.unwrap_err();
    assert_matches!(err, AgencyError::NotFound(_));
    assert_eq!(err.to_string(), "No SSA benefits found for this individual");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cache_fallback_skips_history_write(pool: PgPool) {
    CachedDataRepo::upsert(
        &pool,
        USER,
        "ssa",
        "benefits",
        &benefits_payload(),
        std::time::Duration::from_secs(3600),
    )
    .await
    .unwrap();

    let router = Router::new().route(
        "/beneficiary/123-45-6789/benefits",
        get(|| async { StatusCode::BAD_GATEWAY }),
    );
    let client = client_with_routes(router, &pool).await;

    let benefits = client.get_benefit_information(USER, SSN).await.unwrap();
    assert_eq!(benefits.monthly_benefit, 1450.0);

    // Cached reads never append to the history trail.
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM user_benefit_history WHERE user_id = $1")
            .bind(USER)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn disability_status_is_upserted_per_source(pool: PgPool) {
    let router = Router::new().route(
        "/beneficiary/123-45-6789/disability-status",
        get(|| async {
            Json(json!({
                "determination_date": "2019-08-15",
                "disability_type": "hearing_loss",
                "review_date": "2026-06-01"
            }))
        }),
    );
    let client = client_with_routes(router, &pool).await;

    let status = client.get_disability_status(USER, SSN).await.unwrap();
    assert_eq!(status.disability_type.as_deref(), Some("hearing_loss"));
    client.get_disability_status(USER, SSN).await.unwrap();

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM user_disability_status WHERE user_id = $1 AND source = 'ssa'",
    )
    .bind(USER)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn work_credits_are_persisted(pool: PgPool) {
    let router = Router::new().route(
        "/beneficiary/123-45-6789/work-credits",
        get(|| async {
            Json(json!({
                "total_credits": 32,
                "credits_needed": 40,
                "last_work_year": 2022
            }))
        }),
    );
    let client = client_with_routes(router, &pool).await;

    let credits = client.get_work_credits(USER, SSN).await.unwrap();
    assert_eq!(credits.total_credits, 32);

    let (total, needed): (i32, Option<i32>) = sqlx::query_as(
        "SELECT total_credits, credits_needed FROM user_work_credits WHERE user_id = $1",
    )
    .bind(USER)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(total, 32);
    assert_eq!(needed, Some(40));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn scheduling_records_the_confirmation(pool: PgPool) {
    let router = Router::new().route(
        "/appointments/schedule",
        post(|| async {
            Json(json!({
                "appointment_type": "disability_review",
                "scheduled_date": "2024-09-12T10:00:00Z",
                "confirmation_number": "SSA-88421",
                "accommodations": {"interpreterRequired": true}
            }))
        }),
    );
    let client = client_with_routes(router, &pool).await;

    let confirmation = client
        .schedule_appointment(USER, SSN, "disability_review", "2024-09-12")
        .await
        .unwrap();
    assert_eq!(confirmation.confirmation_number.as_deref(), Some("SSA-88421"));

    let (service, confirmation_number): (String, Option<String>) = sqlx::query_as(
        "SELECT service, confirmation_number FROM user_appointments WHERE user_id = $1",
    )
    .bind(USER)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(service, "ssa");
    assert_eq!(confirmation_number.as_deref(), Some("SSA-88421"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn scheduling_failure_is_not_softened(pool: PgPool) {
    let router = Router::new().route(
        "/appointments/schedule",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let client = client_with_routes(router, &pool).await;

    let err = client
        .schedule_appointment(USER, SSN, "disability_review", "2024-09-12")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "SSA appointment scheduling error: Service Unavailable"
    );

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM user_appointments WHERE user_id = $1")
            .bind(USER)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
}
