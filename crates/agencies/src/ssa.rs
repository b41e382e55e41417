//! SSA adapter: benefit information, disability determinations, work
//! credits, and appointment scheduling.

use std::time::Duration;

use govsync_core::config::AgencyConfig;
use govsync_core::crypto::TokenCipher;
use govsync_core::rate::RateLimiter;
use govsync_core::types::Service;
use govsync_db::repositories::{
    AppointmentRepo, BenefitHistoryRepo, DisabilityStatusRepo, WorkCreditsRepo,
};
use govsync_db::DbPool;
use serde_json::json;

use crate::call::{self, CacheKey, Fetched};
use crate::error::AgencyError;
use crate::oauth::OAuthTokenManager;
use crate::responses::{
    AppointmentConfirmation, SsaApiResponse, SsaDisabilityStatus, SsaWorkCredits,
};
use crate::transform;

const SERVICE: Service = Service::Ssa;
const OAUTH_SCOPE: &str = "benefits-info disability-status work-credits";
const BENEFITS_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Client for the SSA beneficiary API.
pub struct SsaClient {
    config: AgencyConfig,
    client: reqwest::Client,
    oauth: OAuthTokenManager,
    limiter: RateLimiter,
    pool: DbPool,
}

impl SsaClient {
    pub fn new(config: AgencyConfig, cipher: TokenCipher, pool: DbPool) -> Self {
        let client = reqwest::Client::new();
        let oauth = OAuthTokenManager::new(
            SERVICE,
            OAUTH_SCOPE,
            config.clone(),
            client.clone(),
            cipher,
            pool.clone(),
        );
        Self {
            limiter: RateLimiter::per_minute(config.rate_limit.requests_per_minute),
            config,
            client,
            oauth,
            pool,
        }
    }

    fn check_rate_limit(&self) -> Result<(), AgencyError> {
        if self.limiter.try_acquire() {
            Ok(())
        } else {
            Err(AgencyError::RateLimited { service: SERVICE })
        }
    }

    /// Fetch the current benefit record for a beneficiary.
    ///
    /// The raw payload is cached for 12 hours; a fresh live payload also
    /// appends to the benefit history trail.
    pub async fn get_benefit_information(
        &self,
        user_id: &str,
        ssn: &str,
    ) -> Result<SsaApiResponse, AgencyError> {
        self.check_rate_limit()?;
        let token = self.oauth.ensure_valid_token().await?;

        let request = self
            .client
            .get(format!("{}/beneficiary/{ssn}/benefits", self.config.base_url))
            .bearer_auth(&token)
            .header("X-User-ID", user_id);

        let fetched = call::read_through(
            &self.pool,
            SERVICE,
            "get_benefit_information",
            CacheKey {
                user_id,
                service: SERVICE.as_str().to_string(),
                data_type: "benefits",
            },
            BENEFITS_TTL,
            async {
                let raw = call::send(
                    request,
                    SERVICE,
                    "SSA API error",
                    self.config.timeout,
                    Some("No SSA benefits found for this individual"),
                )
                .await?;
                // Reject undecodable payloads before they reach the cache.
                transform::ssa_benefits(&raw)?;
                Ok(raw)
            },
        )
        .await?;

        let benefits = transform::ssa_benefits(fetched.value())?;

        if let Fetched::Live(raw) = &fetched {
            match transform::ssa_effective_date(raw) {
                Some(effective_date) => {
                    call::best_effort(
                        SERVICE,
                        "get_benefit_information",
                        "Benefit history",
                        BenefitHistoryRepo::upsert(
                            &self.pool,
                            user_id,
                            benefits.benefit_type.as_str(),
                            benefits.monthly_benefit,
                            effective_date,
                            SERVICE.as_str(),
                        )
                        .await,
                    );
                }
                None => {
                    tracing::debug!(
                        user_id,
                        "Benefit payload has no effective date, skipping history"
                    );
                }
            }
        }

        Ok(benefits)
    }

    /// Fetch the disability determination and upsert it on
    /// `(user_id, source)`.
    pub async fn get_disability_status(
        &self,
        user_id: &str,
        ssn: &str,
    ) -> Result<SsaDisabilityStatus, AgencyError> {
        self.check_rate_limit()?;
        let token = self.oauth.ensure_valid_token().await?;

        let request = self
            .client
            .get(format!(
                "{}/beneficiary/{ssn}/disability-status",
                self.config.base_url
            ))
            .bearer_auth(&token);

        let raw = call::send(
            request,
            SERVICE,
            "SSA disability status API error",
            self.config.timeout,
            Some("No disability determination found for this individual"),
        )
        .await?;
        let status: SsaDisabilityStatus = serde_json::from_value(raw)?;

        call::best_effort(
            SERVICE,
            "get_disability_status",
            "Disability status",
            DisabilityStatusRepo::upsert(
                &self.pool,
                user_id,
                status.determination_date.as_deref(),
                status.disability_type.as_deref(),
                status.review_date.as_deref(),
                SERVICE.as_str(),
            )
            .await,
        );

        Ok(status)
    }

    /// Fetch work credit totals and upsert them on `(user_id, source)`.
    pub async fn get_work_credits(
        &self,
        user_id: &str,
        ssn: &str,
    ) -> Result<SsaWorkCredits, AgencyError> {
        self.check_rate_limit()?;
        let token = self.oauth.ensure_valid_token().await?;

        let request = self
            .client
            .get(format!(
                "{}/beneficiary/{ssn}/work-credits",
                self.config.base_url
            ))
            .bearer_auth(&token);

        let raw = call::send(
            request,
            SERVICE,
            "SSA work credits API error",
            self.config.timeout,
            Some("No work credit record found for this individual"),
        )
        .await?;
        let credits: SsaWorkCredits = serde_json::from_value(raw)?;

        call::best_effort(
            SERVICE,
            "get_work_credits",
            "Work credits",
            WorkCreditsRepo::upsert(
                &self.pool,
                user_id,
                credits.total_credits,
                credits.credits_needed,
                credits.last_work_year,
                SERVICE.as_str(),
            )
            .await,
        );

        Ok(credits)
    }

    /// Schedule an SSA appointment with deaf-accessible accommodations
    /// attached to the request.
    pub async fn schedule_appointment(
        &self,
        user_id: &str,
        ssn: &str,
        appointment_type: &str,
        preferred_date: &str,
    ) -> Result<AppointmentConfirmation, AgencyError> {
        self.check_rate_limit()?;
        let token = self.oauth.ensure_valid_token().await?;

        let request = self
            .client
            .post(format!("{}/appointments/schedule", self.config.base_url))
            .bearer_auth(&token)
            .json(&json!({
                "ssn": ssn,
                "appointmentType": appointment_type,
                "preferredDate": preferred_date,
                "accommodations": {
                    "interpreterRequired": true,
                    "communicationMethod": "ASL",
                    "accessibilityNeeds": ["visual_alerts", "written_communication"],
                },
            }));

        let raw = call::send(
            request,
            SERVICE,
            "SSA appointment scheduling error",
            self.config.timeout,
            None,
        )
        .await?;
        let confirmation: AppointmentConfirmation = serde_json::from_value(raw)?;

        call::best_effort(
            SERVICE,
            "schedule_appointment",
            "Appointment",
            AppointmentRepo::insert(
                &self.pool,
                user_id,
                SERVICE.as_str(),
                None,
                &confirmation.appointment_type,
                confirmation.scheduled_date.as_deref(),
                confirmation.confirmation_number.as_deref(),
                &confirmation.accommodations,
            )
            .await,
        );

        Ok(confirmation)
    }
}
