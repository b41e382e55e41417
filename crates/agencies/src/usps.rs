//! USPS adapter: address validation, change of address, and package
//! tracking. Authenticates with a static API key, no OAuth.

use govsync_core::config::AgencyConfig;
use govsync_core::rate::RateLimiter;
use govsync_core::types::Service;
use govsync_db::repositories::{AddressChangeRepo, PackageTrackingRepo, ValidatedAddressRepo};
use govsync_db::DbPool;
use serde_json::json;

use crate::call;
use crate::error::AgencyError;
use crate::responses::{ChangeOfAddressReceipt, TrackingInfo, UspsApiResponse};
use crate::transform;

const SERVICE: Service = Service::Usps;

/// Client for the USPS API.
pub struct UspsClient {
    config: AgencyConfig,
    client: reqwest::Client,
    limiter: RateLimiter,
    pool: DbPool,
}

impl UspsClient {
    pub fn new(config: AgencyConfig, pool: DbPool) -> Self {
        Self {
            limiter: RateLimiter::per_minute(config.rate_limit.requests_per_minute),
            config,
            client: reqwest::Client::new(),
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

    /// Standardize an address and report any active forwarding order.
    /// The verdict is upserted on `(user_id, original_address)`.
    pub async fn validate_address(
        &self,
        user_id: &str,
        address: &str,
    ) -> Result<UspsApiResponse, AgencyError> {
        self.check_rate_limit()?;

        let request = self
            .client
            .post(format!("{}/addresses/validate", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "address": address,
                "includeOptionalElements": true,
            }));

        let raw = call::send(
            request,
            SERVICE,
            "USPS address validation error",
            self.config.timeout,
            None,
        )
        .await?;
        let result = transform::usps_validation(&raw)?;

        call::best_effort(
            SERVICE,
            "validate_address",
            "Validated address",
            ValidatedAddressRepo::upsert(
                &self.pool,
                user_id,
                address,
                Some(&result.address_validation.standardized_address),
                result.address_validation.is_valid,
                Some(&result.address_validation.delivery_point),
                Some(&result.address_validation.zip_plus4),
            )
            .await,
        );

        Ok(result)
    }

    /// Submit a change of address with visual-confirmation accommodations
    /// and record the request.
    pub async fn submit_change_of_address(
        &self,
        user_id: &str,
        old_address: &str,
        new_address: &str,
        effective_date: &str,
    ) -> Result<ChangeOfAddressReceipt, AgencyError> {
        self.check_rate_limit()?;

        let request = self
            .client
            .post(format!("{}/change-of-address", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "oldAddress": old_address,
                "newAddress": new_address,
                "effectiveDate": effective_date,
                "accommodations": {
                    "visualConfirmation": true,
                    "emailNotifications": true,
                    "textNotifications": false,
                },
            }));

        let raw = call::send(
            request,
            SERVICE,
            "USPS change of address error",
            self.config.timeout,
            None,
        )
        .await?;
        let receipt: ChangeOfAddressReceipt = serde_json::from_value(raw)?;

        call::best_effort(
            SERVICE,
            "submit_change_of_address",
            "Address change",
            AddressChangeRepo::insert(
                &self.pool,
                user_id,
                old_address,
                new_address,
                effective_date,
                receipt.confirmation_number.as_deref(),
                receipt.status.as_deref(),
            )
            .await,
        );

        Ok(receipt)
    }

    /// Fetch the latest tracking snapshot for a package and upsert it on
    /// `(user_id, tracking_number)`.
    pub async fn track_package(
        &self,
        user_id: &str,
        tracking_number: &str,
    ) -> Result<TrackingInfo, AgencyError> {
        self.check_rate_limit()?;

        let request = self
            .client
            .get(format!("{}/tracking/{tracking_number}", self.config.base_url))
            .bearer_auth(&self.config.api_key);

        let raw = call::send(
            request,
            SERVICE,
            "USPS tracking error",
            self.config.timeout,
            Some("Tracking information not found"),
        )
        .await?;
        let info: TrackingInfo = serde_json::from_value(raw)?;

        call::best_effort(
            SERVICE,
            "track_package",
            "Package tracking",
            PackageTrackingRepo::upsert(
                &self.pool,
                user_id,
                tracking_number,
                info.status.as_deref(),
                info.location.as_deref(),
                info.estimated_delivery.as_deref(),
                info.last_updated.as_deref(),
            )
            .await,
        );

        Ok(info)
    }
}
