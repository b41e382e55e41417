//! OAuth client-credentials token management for IRS and SSA.
//!
//! Tokens are service-level (one credential per agency, shared across
//! users), held in memory for the life of the process, and persisted
//! encrypted so a restart can resume with a still-valid token instead
//! of re-authenticating.

use chrono::{TimeDelta, Utc};
use govsync_core::config::AgencyConfig;
use govsync_core::crypto::TokenCipher;
use govsync_core::types::{Service, Timestamp};
use govsync_db::repositories::ApiTokenRepo;
use govsync_db::DbPool;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::AgencyError;

/// Safety margin subtracted from the advertised token lifetime so a
/// token is refreshed before the agency actually rejects it.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    access_token: String,
    expires_at: Timestamp,
}

impl CachedToken {
    fn is_valid(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}

/// Acquires and refreshes one agency's client-credentials token.
///
/// The in-memory slot is guarded by an async mutex held across the
/// refresh, so concurrent callers wait for one authentication instead
/// of racing the token endpoint.
pub struct OAuthTokenManager {
    service: Service,
    scope: &'static str,
    config: AgencyConfig,
    client: reqwest::Client,
    cipher: TokenCipher,
    pool: DbPool,
    current: Mutex<Option<CachedToken>>,
}

impl OAuthTokenManager {
    pub fn new(
        service: Service,
        scope: &'static str,
        config: AgencyConfig,
        client: reqwest::Client,
        cipher: TokenCipher,
        pool: DbPool,
    ) -> Self {
        Self {
            service,
            scope,
            config,
            client,
            cipher,
            pool,
            current: Mutex::new(None),
        }
    }

    /// Return a currently-valid access token, refreshing if needed.
    ///
    /// Resolution order: in-memory token, then the encrypted row in
    /// `government_api_tokens`, then a fresh client-credentials grant.
    pub async fn ensure_valid_token(&self) -> Result<String, AgencyError> {
        let now = Utc::now();
        let mut slot = self.current.lock().await;

        if let Some(token) = slot.as_ref() {
            if token.is_valid(now) {
                return Ok(token.access_token.clone());
            }
        }

        if slot.is_none() {
            if let Some(stored) = self.load_persisted(now).await? {
                let access_token = stored.access_token.clone();
                *slot = Some(stored);
                return Ok(access_token);
            }
        }

        let refreshed = self.authenticate().await?;
        let access_token = refreshed.access_token.clone();
        *slot = Some(refreshed);
        Ok(access_token)
    }

    /// Recover a still-valid token persisted by a previous process.
    async fn load_persisted(&self, now: Timestamp) -> Result<Option<CachedToken>, AgencyError> {
        let Some(row) = ApiTokenRepo::find(&self.pool, self.service.as_str()).await? else {
            return Ok(None);
        };
        if row.is_expired(now) {
            return Ok(None);
        }
        let access_token = self.cipher.decrypt(&row.encrypted_token)?;
        Ok(Some(CachedToken {
            access_token,
            expires_at: row.expires_at,
        }))
    }

    /// Perform the client-credentials grant and persist the result.
    async fn authenticate(&self) -> Result<CachedToken, AgencyError> {
        let client_id = self.config.client_id.as_deref().ok_or_else(|| {
            AgencyError::NotConfigured(format!(
                "{} OAuth client credentials not configured",
                self.service
            ))
        })?;
        let client_secret = self.config.client_secret.as_deref().ok_or_else(|| {
            AgencyError::NotConfigured(format!(
                "{} OAuth client credentials not configured",
                self.service
            ))
        })?;

        let request = self
            .client
            .post(format!("{}/oauth/token", self.config.base_url))
            .basic_auth(client_id, Some(client_secret))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", self.scope),
            ]);

        let response = tokio::time::timeout(self.config.timeout, request.send())
            .await
            .map_err(|_| AgencyError::Timeout {
                service: self.service,
                timeout: self.config.timeout,
            })??;

        let status = response.status();
        if !status.is_success() {
            return Err(AgencyError::Authentication {
                service: self.service,
                status_text: status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.as_str().to_string()),
            });
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = (token.expires_in - EXPIRY_MARGIN_SECS).max(0);
        let expires_at = Utc::now() + TimeDelta::seconds(lifetime);

        let encrypted = self.cipher.encrypt(&token.access_token)?;
        ApiTokenRepo::upsert(&self.pool, self.service.as_str(), &encrypted, expires_at).await?;

        tracing::info!(
            service = self.service.as_str(),
            expires_at = %expires_at,
            "Authenticated with agency"
        );

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}
