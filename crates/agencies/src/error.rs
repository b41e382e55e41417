//! Error taxonomy shared by all agency adapters.

use std::time::Duration;

use govsync_core::crypto::CryptoError;
use govsync_core::types::Service;

/// Errors from the agency integration layer.
///
/// Read operations fall back to a fresh cache entry for any
/// [fallback-eligible](AgencyError::is_fallback_eligible) error; when the
/// cache also misses, the original error propagates unchanged so callers
/// can distinguish failure causes. Mutating operations never swallow
/// errors.
#[derive(Debug, thiserror::Error)]
pub enum AgencyError {
    /// The OAuth client-credentials grant was rejected.
    #[error("{service} authentication failed: {status_text}")]
    Authentication { service: Service, status_text: String },

    /// The remote returned 404 — "no such record", not a transient failure.
    #[error("{0}")]
    NotFound(&'static str),

    /// Any other non-2xx status. `context` names the failing operation
    /// (e.g. "DMV API error", "IRS disability credits API error").
    #[error("{context}: {status_text}")]
    Remote { context: String, status_text: String },

    /// The remote call exceeded the configured deadline.
    #[error("{service} request timed out after {}ms", timeout.as_millis())]
    Timeout { service: Service, timeout: Duration },

    /// The in-process token bucket for this service is exhausted.
    #[error("{service} rate limit exceeded")]
    RateLimited { service: Service },

    /// The HTTP request itself failed (connect, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A persistence failure. Cache and record writes on success paths
    /// are best-effort and only logged; this surfaces where storage is
    /// the operation's own purpose (credential persistence, sync status).
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// No configuration exists for the requested service or state.
    #[error("{0}")]
    NotConfigured(String),

    /// The response payload could not be decoded into the expected shape.
    #[error("Invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Token encryption or decryption failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl AgencyError {
    /// Whether a read operation may serve cached data after this error.
    ///
    /// Authentication and rate-limit failures happen before the remote
    /// call and are never masked by the cache.
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(
            self,
            AgencyError::NotFound(_)
                | AgencyError::Remote { .. }
                | AgencyError::Timeout { .. }
                | AgencyError::Transport(_)
                | AgencyError::Decode(_)
        )
    }
}
