//! DMV adapter. DMV APIs are state-administered: every operation takes a
//! two-letter state code and resolves that state's endpoint, key, and
//! rate budget.

use std::collections::HashMap;
use std::time::Duration;

use govsync_core::config::AgencyConfig;
use govsync_core::rate::RateLimiter;
use govsync_core::types::Service;
use govsync_db::models::license::NewUserLicense;
use govsync_db::repositories::{
    AccommodationRequestRepo, AppointmentRepo, LicenseRenewalRepo, LicenseRepo,
};
use govsync_db::DbPool;
use serde::Serialize;
use serde_json::json;

use crate::call::{self, CacheKey, Fetched};
use crate::error::AgencyError;
use crate::responses::{
    AccommodationUpdateReceipt, AppointmentConfirmation, DmvApiResponse, RenewalReceipt,
};
use crate::transform;

const SERVICE: Service = Service::Dmv;
const LICENSE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// An accommodation to request on a license.
#[derive(Debug, Clone, Serialize)]
pub struct AccommodationChange {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

struct StateApi {
    config: AgencyConfig,
    limiter: RateLimiter,
}

/// Client for state DMV APIs.
pub struct DmvClient {
    states: HashMap<String, StateApi>,
    client: reqwest::Client,
    pool: DbPool,
}

impl DmvClient {
    pub fn new(state_configs: HashMap<String, AgencyConfig>, pool: DbPool) -> Self {
        let states = state_configs
            .into_iter()
            .map(|(state, config)| {
                let limiter = RateLimiter::per_minute(config.rate_limit.requests_per_minute);
                (state, StateApi { config, limiter })
            })
            .collect();
        Self {
            states,
            client: reqwest::Client::new(),
            pool,
        }
    }

    /// Resolve a state's API, consuming one rate-limit token.
    fn state_api(&self, state: &str) -> Result<&StateApi, AgencyError> {
        let api = self.states.get(state).ok_or_else(|| {
            AgencyError::NotConfigured(format!("DMV API not configured for state: {state}"))
        })?;
        if !api.limiter.try_acquire() {
            return Err(AgencyError::RateLimited { service: SERVICE });
        }
        Ok(api)
    }

    /// Fetch a license record.
    ///
    /// The raw payload is cached for 7 days under the state-scoped key
    /// `dmv_{state}`; a fresh live payload also upserts `user_licenses`.
    pub async fn get_license_information(
        &self,
        user_id: &str,
        state: &str,
        license_number: &str,
    ) -> Result<DmvApiResponse, AgencyError> {
        let api = self.state_api(state)?;

        let request = self
            .client
            .get(format!("{}/license/{license_number}", api.config.base_url))
            .bearer_auth(&api.config.api_key)
            .header("X-State", state);

        let fetched = call::read_through(
            &self.pool,
            SERVICE,
            "get_license_information",
            CacheKey {
                user_id,
                service: format!("dmv_{state}"),
                data_type: "license",
            },
            LICENSE_TTL,
            async {
                let raw = call::send(
                    request,
                    SERVICE,
                    "DMV API error",
                    api.config.timeout,
                    Some("License not found"),
                )
                .await?;
                // Reject undecodable payloads before they reach the cache.
                transform::dmv_license(&raw)?;
                Ok(raw)
            },
        )
        .await?;

        let license = transform::dmv_license(fetched.value())?;

        if matches!(fetched, Fetched::Live(_)) {
            call::best_effort(
                SERVICE,
                "get_license_information",
                "License",
                LicenseRepo::upsert(
                    &self.pool,
                    user_id,
                    &NewUserLicense {
                        state: &license.state,
                        license_number: &license.license_number,
                        license_type: &license.license_type,
                        expiration_date: &license.expiration_date,
                        restrictions: json!(&license.restrictions),
                        endorsements: json!(&license.endorsements),
                        disability_accommodations: json!(&license.disability_accommodations),
                        real_id_compliant: license.real_id_compliant,
                    },
                )
                .await,
            );
        }

        Ok(license)
    }

    /// Request accommodation changes on a license and record the request.
    pub async fn update_disability_accommodations(
        &self,
        user_id: &str,
        state: &str,
        license_number: &str,
        accommodations: &[AccommodationChange],
    ) -> Result<AccommodationUpdateReceipt, AgencyError> {
        let api = self.state_api(state)?;

        let request = self
            .client
            .put(format!(
                "{}/license/{license_number}/accommodations",
                api.config.base_url
            ))
            .bearer_auth(&api.config.api_key)
            .header("X-State", state)
            .json(&json!({
                "accommodations": accommodations,
                "requestedBy": user_id,
                "medicalDocumentation": true,
            }));

        let raw = call::send(
            request,
            SERVICE,
            "DMV accommodation update error",
            api.config.timeout,
            None,
        )
        .await?;
        let receipt: AccommodationUpdateReceipt = serde_json::from_value(raw)?;

        call::best_effort(
            SERVICE,
            "update_disability_accommodations",
            "Accommodation request",
            AccommodationRequestRepo::insert(
                &self.pool,
                user_id,
                SERVICE.as_str(),
                Some(state),
                "license_accommodation",
                &json!(accommodations),
                receipt.status.as_deref(),
                receipt.confirmation_number.as_deref(),
            )
            .await,
        );

        Ok(receipt)
    }

    /// Renew a license, carrying the current accommodations forward.
    ///
    /// The prerequisite license read must succeed: a renewal without
    /// the accommodations on file could silently drop them.
    pub async fn renew_license(
        &self,
        user_id: &str,
        state: &str,
        license_number: &str,
    ) -> Result<RenewalReceipt, AgencyError> {
        let current = self
            .get_license_information(user_id, state, license_number)
            .await?;

        let api = self.state_api(state)?;
        let request = self
            .client
            .post(format!(
                "{}/license/{license_number}/renew",
                api.config.base_url
            ))
            .bearer_auth(&api.config.api_key)
            .header("X-State", state)
            .json(&json!({
                "maintainAccommodations": true,
                "currentAccommodations": current.disability_accommodations,
                "communicationPreference": "written",
                "interpreterRequired": true,
            }));

        let raw = call::send(
            request,
            SERVICE,
            "DMV license renewal error",
            api.config.timeout,
            None,
        )
        .await?;
        let receipt: RenewalReceipt = serde_json::from_value(raw)?;

        call::best_effort(
            SERVICE,
            "renew_license",
            "License renewal",
            LicenseRenewalRepo::insert(
                &self.pool,
                user_id,
                state,
                receipt.new_expiration_date.as_deref(),
                receipt.confirmation_number.as_deref(),
                receipt.status.as_deref(),
            )
            .await,
        );

        Ok(receipt)
    }

    /// Schedule a DMV appointment with deaf-accessible accommodations
    /// attached to the request.
    pub async fn schedule_appointment(
        &self,
        user_id: &str,
        state: &str,
        appointment_type: &str,
        preferred_date: &str,
    ) -> Result<AppointmentConfirmation, AgencyError> {
        let api = self.state_api(state)?;

        let request = self
            .client
            .post(format!("{}/appointments/schedule", api.config.base_url))
            .bearer_auth(&api.config.api_key)
            .header("X-State", state)
            .json(&json!({
                "appointmentType": appointment_type,
                "preferredDate": preferred_date,
                "accommodations": {
                    "interpreterRequired": true,
                    "communicationMethod": "ASL",
                    "writtenInstructions": true,
                    "visualAlerts": true,
                    "extendedTime": true,
                },
                "contactMethod": "email",
            }));

        let raw = call::send(
            request,
            SERVICE,
            "DMV appointment scheduling error",
            api.config.timeout,
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
                Some(state),
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
