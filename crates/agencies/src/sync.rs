//! Cross-agency sync orchestration.
//!
//! A sync run pulls each requested service in turn, collecting per-agency
//! failures as messages instead of aborting the run, then records the
//! outcome in `government_sync_status` with the next run scheduled 24
//! hours out.

use std::collections::BTreeMap;

use chrono::{Datelike, Utc};
use govsync_core::types::{Service, Timestamp};
use govsync_db::repositories::SyncStatusRepo;
use govsync_db::DbPool;
use serde::Serialize;
use serde_json::json;

use crate::dmv::DmvClient;
use crate::error::AgencyError;
use crate::irs::IrsClient;
use crate::responses::{
    DisabilityCreditRecord, DmvApiResponse, IrsApiResponse, MedicalDeductionRecord,
    SsaApiResponse, SsaDisabilityStatus, SsaWorkCredits, UspsApiResponse,
};
use crate::ssa::SsaClient;
use crate::usps::UspsClient;

/// The government identifiers a sync run needs. Supplied by the caller;
/// the orchestrator has no access to identity storage.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user_id: String,
    pub ssn: String,
    pub state_licenses: Vec<StateLicense>,
    pub addresses: Vec<String>,
}

/// A driver's license held in one state.
#[derive(Debug, Clone)]
pub struct StateLicense {
    pub state_code: String,
    pub license_number: String,
}

/// Everything pulled from the IRS in one run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IrsSyncResult {
    pub taxpayer_info: IrsApiResponse,
    pub disability_credits: Vec<DisabilityCreditRecord>,
    pub medical_deductions: Vec<MedicalDeductionRecord>,
}

/// Everything pulled from the SSA in one run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SsaSyncResult {
    pub benefits: SsaApiResponse,
    pub disability_status: SsaDisabilityStatus,
    pub work_credits: SsaWorkCredits,
}

/// Everything pulled from USPS in one run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UspsSyncResult {
    pub address_validations: Vec<UspsApiResponse>,
}

/// Outcome of one sync run. A service absent from the request, or one
/// whose pull failed, is `None` (`dmv` entries are per state); failures
/// land in `errors`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub irs: Option<IrsSyncResult>,
    pub ssa: Option<SsaSyncResult>,
    pub dmv: BTreeMap<String, DmvApiResponse>,
    pub usps: Option<UspsSyncResult>,
    pub errors: Vec<String>,
    pub synced_at: Timestamp,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs cross-agency syncs with injected clients and pool.
pub struct SyncRunner {
    irs: IrsClient,
    ssa: SsaClient,
    dmv: DmvClient,
    usps: UspsClient,
    pool: DbPool,
}

impl SyncRunner {
    pub fn new(
        irs: IrsClient,
        ssa: SsaClient,
        dmv: DmvClient,
        usps: UspsClient,
        pool: DbPool,
    ) -> Self {
        Self {
            irs,
            ssa,
            dmv,
            usps,
            pool,
        }
    }

    /// Sync the requested services for one user.
    ///
    /// Per-agency failures are collected, not fatal; the only error this
    /// returns is a failure to record the run itself.
    pub async fn run(
        &self,
        profile: &UserProfile,
        services: &[Service],
    ) -> Result<SyncReport, AgencyError> {
        let mut report = SyncReport {
            irs: None,
            ssa: None,
            dmv: BTreeMap::new(),
            usps: None,
            errors: Vec::new(),
            synced_at: Utc::now(),
        };

        if services.contains(&Service::Irs) {
            match self.sync_irs(profile).await {
                Ok(result) => report.irs = Some(result),
                Err(e) => report.errors.push(format!("IRS sync failed: {e}")),
            }
        }

        if services.contains(&Service::Ssa) {
            match self.sync_ssa(profile).await {
                Ok(result) => report.ssa = Some(result),
                Err(e) => report.errors.push(format!("SSA sync failed: {e}")),
            }
        }

        if services.contains(&Service::Dmv) {
            for license in &profile.state_licenses {
                match self
                    .dmv
                    .get_license_information(
                        &profile.user_id,
                        &license.state_code,
                        &license.license_number,
                    )
                    .await
                {
                    Ok(result) => {
                        report.dmv.insert(license.state_code.clone(), result);
                    }
                    Err(e) => report
                        .errors
                        .push(format!("DMV sync failed for {}: {e}", license.state_code)),
                }
            }
        }

        if services.contains(&Service::Usps) {
            let mut validations = Vec::new();
            for address in &profile.addresses {
                match self.usps.validate_address(&profile.user_id, address).await {
                    Ok(result) => validations.push(result),
                    Err(e) => report
                        .errors
                        .push(format!("USPS address validation failed: {e}")),
                }
            }
            report.usps = Some(UspsSyncResult {
                address_validations: validations,
            });
        }

        let service_names: Vec<&str> = services.iter().map(|s| s.as_str()).collect();
        SyncStatusRepo::upsert(
            &self.pool,
            &profile.user_id,
            &json!(service_names),
            report.is_success(),
        )
        .await?;

        tracing::info!(
            user_id = profile.user_id,
            services = ?service_names,
            errors = report.errors.len(),
            "Sync run recorded"
        );

        Ok(report)
    }

    async fn sync_irs(&self, profile: &UserProfile) -> Result<IrsSyncResult, AgencyError> {
        let tax_year = Utc::now().year();
        Ok(IrsSyncResult {
            taxpayer_info: self
                .irs
                .get_taxpayer_info(&profile.user_id, &profile.ssn, tax_year)
                .await?,
            disability_credits: self
                .irs
                .get_disability_tax_credits(&profile.user_id, &profile.ssn, tax_year)
                .await?,
            medical_deductions: self
                .irs
                .get_medical_deductions(&profile.user_id, &profile.ssn, tax_year)
                .await?,
        })
    }

    async fn sync_ssa(&self, profile: &UserProfile) -> Result<SsaSyncResult, AgencyError> {
        Ok(SsaSyncResult {
            benefits: self
                .ssa
                .get_benefit_information(&profile.user_id, &profile.ssn)
                .await?,
            disability_status: self
                .ssa
                .get_disability_status(&profile.user_id, &profile.ssn)
                .await?,
            work_credits: self
                .ssa
                .get_work_credits(&profile.user_id, &profile.ssn)
                .await?,
        })
    }
}
