//! IRS adapter: taxpayer records, disability tax credits, and medical
//! deductions.

use std::time::Duration;

use govsync_core::config::AgencyConfig;
use govsync_core::crypto::TokenCipher;
use govsync_core::rate::RateLimiter;
use govsync_core::types::Service;
use govsync_db::repositories::{MedicalDeductionRepo, TaxCreditRepo};
use govsync_db::DbPool;

use crate::call::{self, CacheKey};
use crate::error::AgencyError;
use crate::oauth::OAuthTokenManager;
use crate::responses::{DisabilityCreditRecord, IrsApiResponse, MedicalDeductionRecord};
use crate::transform;

const SERVICE: Service = Service::Irs;
const OAUTH_SCOPE: &str = "taxpayer-info disability-credits medical-deductions";
const TAX_INFO_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Client for the IRS taxpayer API.
pub struct IrsClient {
    config: AgencyConfig,
    client: reqwest::Client,
    oauth: OAuthTokenManager,
    limiter: RateLimiter,
    pool: DbPool,
}

impl IrsClient {
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

    /// Fetch the taxpayer record for one tax year.
    ///
    /// The raw payload is cached for 24 hours and served from the cache
    /// when the live call fails.
    pub async fn get_taxpayer_info(
        &self,
        user_id: &str,
        ssn: &str,
        tax_year: i32,
    ) -> Result<IrsApiResponse, AgencyError> {
        self.check_rate_limit()?;
        let token = self.oauth.ensure_valid_token().await?;

        let request = self
            .client
            .get(format!(
                "{}/taxpayer/{ssn}/tax-year/{tax_year}",
                self.config.base_url
            ))
            .bearer_auth(&token)
            .header("X-User-ID", user_id);

        let fetched = call::read_through(
            &self.pool,
            SERVICE,
            "get_taxpayer_info",
            CacheKey {
                user_id,
                service: SERVICE.as_str().to_string(),
                data_type: "tax_info",
            },
            TAX_INFO_TTL,
            async {
                let raw = call::send(
                    request,
                    SERVICE,
                    "IRS API error",
                    self.config.timeout,
                    Some("Tax information not found for specified year"),
                )
                .await?;
                // Reject undecodable payloads before they reach the cache.
                transform::irs_tax_info(&raw)?;
                Ok(raw)
            },
        )
        .await?;

        Ok(transform::irs_tax_info(fetched.value())?)
    }

    /// Fetch disability tax credits for one tax year and upsert each on
    /// `(user_id, credit_type, tax_year)`.
    pub async fn get_disability_tax_credits(
        &self,
        user_id: &str,
        ssn: &str,
        tax_year: i32,
    ) -> Result<Vec<DisabilityCreditRecord>, AgencyError> {
        self.check_rate_limit()?;
        let token = self.oauth.ensure_valid_token().await?;

        let request = self
            .client
            .get(format!(
                "{}/taxpayer/{ssn}/disability-credits/{tax_year}",
                self.config.base_url
            ))
            .bearer_auth(&token);

        let raw = call::send(
            request,
            SERVICE,
            "IRS disability credits API error",
            self.config.timeout,
            Some("Disability credit information not found"),
        )
        .await?;
        let credits = transform::irs_disability_credits(&raw)?;

        for credit in &credits {
            call::best_effort(
                SERVICE,
                "get_disability_tax_credits",
                "Tax credit",
                TaxCreditRepo::upsert(
                    &self.pool,
                    user_id,
                    &credit.credit_type,
                    credit.amount,
                    credit.tax_year,
                    Some(&credit.eligibility_reason),
                    SERVICE.as_str(),
                )
                .await,
            );
        }

        Ok(credits)
    }

    /// Fetch medical deductions for one tax year.
    ///
    /// The full list is returned; only hearing-related deductions are
    /// persisted.
    pub async fn get_medical_deductions(
        &self,
        user_id: &str,
        ssn: &str,
        tax_year: i32,
    ) -> Result<Vec<MedicalDeductionRecord>, AgencyError> {
        self.check_rate_limit()?;
        let token = self.oauth.ensure_valid_token().await?;

        let request = self
            .client
            .get(format!(
                "{}/taxpayer/{ssn}/medical-deductions/{tax_year}",
                self.config.base_url
            ))
            .bearer_auth(&token);

        let raw = call::send(
            request,
            SERVICE,
            "IRS medical deductions API error",
            self.config.timeout,
            Some("Medical deduction information not found"),
        )
        .await?;
        let deductions = transform::irs_medical_deductions(&raw)?;

        for deduction in deductions.iter().filter(|d| transform::is_hearing_related(d)) {
            call::best_effort(
                SERVICE,
                "get_medical_deductions",
                "Medical deduction",
                MedicalDeductionRepo::upsert(
                    &self.pool,
                    user_id,
                    &deduction.category,
                    deduction.amount,
                    Some(&deduction.description),
                    deduction.tax_year,
                    SERVICE.as_str(),
                )
                .await,
            );
        }

        Ok(deductions)
    }
}
