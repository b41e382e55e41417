mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use govsync_agencies::{AgencyError, IrsClient};
use govsync_db::repositories::{ApiTokenRepo, CachedDataRepo};
use serde_json::json;
use sqlx::PgPool;

use common::{oauth_token_route, spawn_stub, test_cipher, test_config};

const USER: &str = "user-1";
const SSN: &str = "123-45-6789";

fn taxpayer_payload() -> serde_json::Value {
    json!({
        "taxpayer_id": "TP-1001",
        "tax_year": 2023,
        "filing_status": "single",
        "agi": 48250.0,
        "tax_liability": 5120.0,
        "refund_amount": 310.0,
        "disability_credits": [
            {"creditType": "disability_access", "amount": 500.0,
             "eligibilityReason": "hearing impairment"}
        ],
        "medical_deductions": [
            {"category": "hearing_aids", "amount": 3200.0,
             "description": "Bilateral hearing aids"}
        ],
        "last_updated": "2024-02-01"
    })
}

async fn client_with_routes(router: Router, pool: &PgPool) -> IrsClient {
    let base_url = spawn_stub(oauth_token_route(router)).await;
    IrsClient::new(test_config(&base_url), test_cipher(), pool.clone())
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn taxpayer_info_is_normalized_and_cached(pool: PgPool) {
    let payload = taxpayer_payload();
    let router = Router::new().route(
        "/taxpayer/123-45-6789/tax-year/2023",
        get({
            let payload = payload.clone();
            move || async move { Json(payload) }
        }),
    );
    let client = client_with_routes(router, &pool).await;

    let info = client.get_taxpayer_info(USER, SSN, 2023).await.unwrap();
    assert_eq!(info.taxpayer_id, "TP-1001");
    assert_eq!(info.adjusted_gross_income, 48250.0);
    assert_eq!(info.refund_amount, Some(310.0));
    assert_eq!(info.disability_credits[0].credit_type, "disability_access");

    // The raw payload is cached under (user, irs, tax_info).
    let cached = CachedDataRepo::get_fresh(&pool, USER, "irs", "tax_info")
        .await
        .unwrap()
        .expect("cache row");
    assert_eq!(cached.data, payload);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_is_acquired_once_and_persisted_encrypted(pool: PgPool) {
    let oauth_hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route(
            "/oauth/token",
            post({
                let oauth_hits = oauth_hits.clone();
                move || async move {
                    oauth_hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"access_token": "test-token", "expires_in": 3600}))
                }
            }),
        )
        .route(
            "/taxpayer/123-45-6789/tax-year/2023",
            get(|| async { Json(taxpayer_payload()) }),
        );
    let base_url = spawn_stub(router).await;
    let client = IrsClient::new(test_config(&base_url), test_cipher(), pool.clone());

    client.get_taxpayer_info(USER, SSN, 2023).await.unwrap();
    client.get_taxpayer_info(USER, SSN, 2023).await.unwrap();

    assert_eq!(oauth_hits.load(Ordering::SeqCst), 1);

    let row = ApiTokenRepo::find(&pool, "irs").await.unwrap().expect("token row");
    assert_eq!(test_cipher().decrypt(&row.encrypted_token).unwrap(), "test-token");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn auth_failure_is_never_masked_by_cache(pool: PgPool) {
    CachedDataRepo::upsert(
        &pool,
        USER,
        "irs",
        "tax_info",
        &taxpayer_payload(),
        std::time::Duration::from_secs(3600),
    )
    .await
    .unwrap();

    let router = Router::new().route(
        "/oauth/token",
        post(|| async { StatusCode::UNAUTHORIZED }),
    );
    let base_url = spawn_stub(router).await;
    let client = IrsClient::new(test_config(&base_url), test_cipher(), pool.clone());

    let err = client.get_taxpayer_info(USER, SSN, 2023).await.unwrap_err();
    assert_matches!(err, AgencyError::Authentication { .. });
    assert_eq!(err.to_string(), "IRS authentication failed: Unauthorized");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn server_error_falls_back_to_fresh_cache(pool: PgPool) {
    CachedDataRepo::upsert(
        &pool,
        USER,
        "irs",
        "tax_info",
        &taxpayer_payload(),
        std::time::Duration::from_secs(3600),
    )
    .await
    .unwrap();

    let router = Router::new().route(
        "/taxpayer/123-45-6789/tax-year/2023",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let client = client_with_routes(router, &pool).await;

    let info = client.get_taxpayer_info(USER, SSN, 2023).await.unwrap();
    assert_eq!(info.taxpayer_id, "TP-1001");
    assert_eq!(info.tax_liability, 5120.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn server_error_without_cache_propagates(pool: PgPool) {
    let router = Router::new().route(
        "/taxpayer/123-45-6789/tax-year/2023",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let client = client_with_routes(router, &pool).await;

    let err = client.get_taxpayer_info(USER, SSN, 2023).await.unwrap_err();
    assert_eq!(err.to_string(), "IRS API error: Internal Server Error");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_year_is_not_found(pool: PgPool) {
    let router = Router::new().route(
        "/taxpayer/123-45-6789/tax-year/2023",
        get(|| async { StatusCode::NOT_FOUND }),
    );
    let client = client_with_routes(router, &pool).await;

    let err = client.get_taxpayer_info(USER, SSN, 2023).await.unwrap_err();
    assert_matches!(err, AgencyError::NotFound(_));
    assert_eq!(err.to_string(), "Tax information not found for specified year");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_credits_are_not_found_even_with_cached_tax_info(pool: PgPool) {
    // A fresh tax_info cache row must not soften a credit lookup miss.
    CachedDataRepo::upsert(
        &pool,
        USER,
        "irs",
        "tax_info",
        &taxpayer_payload(),
        std::time::Duration::from_secs(3600),
    )
    .await
    .unwrap();

    let router = Router::new().route(
        "/taxpayer/123-45-6789/disability-credits/2023",
        get(|| async { StatusCode::NOT_FOUND }),
    );
    let client = client_with_routes(router, &pool).await;

    let err = client
        .get_disability_tax_credits(USER, SSN, 2023)
        .await
        .unwrap_err();
    assert_matches!(err, AgencyError::NotFound(_));
    assert_eq!(err.to_string(), "Disability credit information not found");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_tax_credits WHERE user_id = $1")
        .bind(USER)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn disability_credits_are_upserted_per_type_and_year(pool: PgPool) {
    let router = Router::new().route(
        "/taxpayer/123-45-6789/disability-credits/2023",
        get(|| async {
            Json(json!({"credits": [
                {"creditType": "disability_access", "amount": 500.0,
                 "taxYear": 2023, "eligibilityReason": "hearing impairment"},
                {"creditType": "elderly_disabled", "amount": 750.0,
                 "taxYear": 2023, "eligibilityReason": "SSDI recipient"}
            ]}))
        }),
    );
    let client = client_with_routes(router, &pool).await;

    let credits = client
        .get_disability_tax_credits(USER, SSN, 2023)
        .await
        .unwrap();
    assert_eq!(credits.len(), 2);

    // A second run updates in place rather than duplicating.
    client
        .get_disability_tax_credits(USER, SSN, 2023)
        .await
        .unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_tax_credits WHERE user_id = $1")
        .bind(USER)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_hearing_related_deductions_are_persisted(pool: PgPool) {
    let router = Router::new().route(
        "/taxpayer/123-45-6789/medical-deductions/2023",
        get(|| async {
            Json(json!({"deductions": [
                {"category": "hearing_aids", "amount": 3200.0,
                 "description": "Bilateral hearing aids", "taxYear": 2023},
                {"category": "equipment", "amount": 8000.0,
                 "description": "Cochlear implant processor upgrade", "taxYear": 2023},
                {"category": "mobility", "amount": 1500.0,
                 "description": "Wheelchair ramp", "taxYear": 2023}
            ]}))
        }),
    );
    let client = client_with_routes(router, &pool).await;

    let deductions = client.get_medical_deductions(USER, SSN, 2023).await.unwrap();
    // The caller still sees the full list.
    assert_eq!(deductions.len(), 3);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM user_medical_deductions WHERE user_id = $1")
            .bind(USER)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 2);
}
