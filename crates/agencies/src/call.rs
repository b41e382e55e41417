//! Shared resilient-call control flow.
//!
//! Every adapter operation is the same algorithm with different
//! parameters: send a deadline-bounded HTTP request, classify the
//! status, and (for reads) write the raw payload through to the cache
//! with a failure fallback. The helpers here hold that algorithm once
//! so each adapter stays a thin configuration of it.

use std::future::Future;
use std::time::Duration;

use govsync_core::types::Service;
use govsync_db::repositories::CachedDataRepo;
use sqlx::PgPool;

use crate::error::AgencyError;

/// Cache identity for one read operation.
pub(crate) struct CacheKey<'a> {
    pub user_id: &'a str,
    /// Cache `service` column value. DMV keys per state (`dmv_CA`);
    /// federal agencies use the bare service name.
    pub service: String,
    pub data_type: &'static str,
}

/// Where a read result came from.
pub(crate) enum Fetched {
    /// Fresh from the remote API; side-effect records should be written.
    Live(serde_json::Value),
    /// Served from the cache after a live failure; no records are written.
    Cached(serde_json::Value),
}

impl Fetched {
    pub(crate) fn value(&self) -> &serde_json::Value {
        match self {
            Fetched::Live(v) | Fetched::Cached(v) => v,
        }
    }
}

/// Send a request with an explicit deadline and classify the response.
///
/// * 404 becomes [`AgencyError::NotFound`] with the supplied domain
///   message; operations without one (mutations) classify 404 as any
///   other non-2xx.
/// * Other non-2xx statuses become [`AgencyError::Remote`] under
///   `context` (e.g. "DMV API error: Internal Server Error").
/// * 2xx bodies are parsed as JSON.
pub(crate) async fn send(
    request: reqwest::RequestBuilder,
    service: Service,
    context: &str,
    timeout: Duration,
    not_found: Option<&'static str>,
) -> Result<serde_json::Value, AgencyError> {
    let response = tokio::time::timeout(timeout, request.send())
        .await
        .map_err(|_| AgencyError::Timeout { service, timeout })??;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        if let Some(message) = not_found {
            return Err(AgencyError::NotFound(message));
        }
    }
    if !status.is_success() {
        return Err(AgencyError::Remote {
            context: context.to_string(),
            status_text: status_text(status),
        });
    }

    let body = tokio::time::timeout(timeout, response.json::<serde_json::Value>())
        .await
        .map_err(|_| AgencyError::Timeout { service, timeout })??;
    Ok(body)
}

/// Human-readable status text, falling back to the numeric code for
/// non-standard statuses.
fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

/// Drive a read operation: live call, write-through cache, failure
/// fallback.
///
/// On live success the raw payload is cached best-effort (a cache write
/// failure is logged and never blocks returning the result). On live
/// failure the cache is consulted; a fresh entry is returned instead of
/// the error, otherwise the *original* error propagates unchanged.
pub(crate) async fn read_through<F>(
    pool: &PgPool,
    service: Service,
    operation: &'static str,
    key: CacheKey<'_>,
    ttl: Duration,
    live: F,
) -> Result<Fetched, AgencyError>
where
    F: Future<Output = Result<serde_json::Value, AgencyError>>,
{
    match live.await {
        Ok(raw) => {
            if let Err(e) =
                CachedDataRepo::upsert(pool, key.user_id, &key.service, key.data_type, &raw, ttl)
                    .await
            {
                tracing::error!(
                    service = service.as_str(),
                    operation,
                    error = %e,
                    "Cache write failed"
                );
            }
            Ok(Fetched::Live(raw))
        }
        Err(err) => {
            tracing::error!(
                service = service.as_str(),
                operation,
                error = %err,
                "Live call failed, trying cache fallback"
            );

            match CachedDataRepo::get_fresh(pool, key.user_id, &key.service, key.data_type).await {
                Ok(Some(row)) => {
                    tracing::warn!(
                        service = service.as_str(),
                        operation,
                        cached_at = %row.cached_at,
                        "Serving cached data after live failure"
                    );
                    Ok(Fetched::Cached(row.data))
                }
                Ok(None) => Err(err),
                Err(cache_err) => {
                    tracing::error!(
                        service = service.as_str(),
                        operation,
                        error = %cache_err,
                        "Cache read failed during fallback"
                    );
                    Err(err)
                }
            }
        }
    }
}

/// Log a failed best-effort record write without propagating it.
pub(crate) fn best_effort<T>(
    service: Service,
    operation: &'static str,
    what: &'static str,
    result: Result<T, sqlx::Error>,
) {
    if let Err(e) = result {
        tracing::error!(
            service = service.as_str(),
            operation,
            error = %e,
            "{what} write failed"
        );
    }
}
