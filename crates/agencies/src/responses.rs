//! Normalized agency response types.
//!
//! Agencies answer with snake_case payloads; the platform's public
//! shape is camelCase. Types that map field-for-field deserialize the
//! wire names and serialize the normalized ones; the rest are built by
//! [`crate::transform`]. Nested collection items arrive camelCase
//! already and keep one rename set for both directions.

use serde::{Deserialize, Serialize};

/// Normalized IRS taxpayer record for one tax year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IrsApiResponse {
    pub taxpayer_id: String,
    pub tax_year: i32,
    pub filing_status: String,
    pub adjusted_gross_income: f64,
    pub tax_liability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<f64>,
    pub disability_credits: Vec<DisabilityCredit>,
    pub medical_deductions: Vec<MedicalDeduction>,
    pub last_updated: String,
}

/// A disability credit as embedded in the taxpayer record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisabilityCredit {
    pub credit_type: String,
    pub amount: f64,
    pub eligibility_reason: String,
}

/// A medical deduction as embedded in the taxpayer record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalDeduction {
    pub category: String,
    pub amount: f64,
    pub description: String,
}

/// A disability credit record from the dedicated credits endpoint,
/// which also carries the tax year it applies to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisabilityCreditRecord {
    pub credit_type: String,
    pub amount: f64,
    pub tax_year: i32,
    pub eligibility_reason: String,
}

/// A medical deduction record from the dedicated deductions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalDeductionRecord {
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub tax_year: i32,
}

/// SSA benefit classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BenefitType {
    #[serde(rename = "SSI")]
    Ssi,
    #[serde(rename = "SSDI")]
    Ssdi,
    #[serde(rename = "both")]
    Both,
    #[serde(rename = "none")]
    None,
}

impl BenefitType {
    pub fn as_str(self) -> &'static str {
        match self {
            BenefitType::Ssi => "SSI",
            BenefitType::Ssdi => "SSDI",
            BenefitType::Both => "both",
            BenefitType::None => "none",
        }
    }
}

/// Normalized SSA benefit record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SsaApiResponse {
    pub beneficiary_id: String,
    pub benefit_type: BenefitType,
    pub monthly_benefit: f64,
    pub disability_onset_date: String,
    pub review_date: String,
    pub work_credits: i32,
    pub medical_review_schedule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representative_payee: Option<RepresentativePayee>,
    pub last_updated: String,
}

/// Third party authorized to receive benefits on the beneficiary's behalf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepresentativePayee {
    pub name: String,
    pub relationship: String,
}

/// SSA disability determination details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SsaDisabilityStatus {
    #[serde(default)]
    pub determination_date: Option<String>,
    #[serde(default)]
    pub disability_type: Option<String>,
    #[serde(default)]
    pub review_date: Option<String>,
}

/// SSA work credit totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SsaWorkCredits {
    pub total_credits: i32,
    #[serde(default)]
    pub credits_needed: Option<i32>,
    #[serde(default)]
    pub last_work_year: Option<i32>,
}

/// Normalized DMV license record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DmvApiResponse {
    pub license_number: String,
    pub state: String,
    pub license_type: String,
    pub expiration_date: String,
    #[serde(default)]
    pub restrictions: Vec<String>,
    #[serde(default)]
    pub endorsements: Vec<String>,
    #[serde(default)]
    pub disability_accommodations: Vec<DisabilityAccommodation>,
    pub real_id_compliant: bool,
    pub last_updated: String,
}

/// An accommodation noted on a license.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisabilityAccommodation {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub valid_until: String,
}

/// Confirmation returned by a DMV accommodation update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct AccommodationUpdateReceipt {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub confirmation_number: Option<String>,
}

/// Confirmation returned by a DMV license renewal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct RenewalReceipt {
    #[serde(default)]
    pub new_expiration_date: Option<String>,
    #[serde(default)]
    pub confirmation_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Confirmation returned by appointment scheduling (SSA and DMV).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct AppointmentConfirmation {
    pub appointment_type: String,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub confirmation_number: Option<String>,
    #[serde(default)]
    pub accommodations: serde_json::Value,
}

/// Normalized USPS response: validation verdict plus any active
/// change-of-address on file for the location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UspsApiResponse {
    pub address_validation: AddressValidation,
    pub change_of_address: ChangeOfAddressStatus,
}

/// USPS standardization verdict for one address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressValidation {
    pub is_valid: bool,
    pub standardized_address: String,
    pub delivery_point: String,
    pub zip_plus4: String,
}

/// Active forwarding order, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeOfAddressStatus {
    pub has_active_change: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarding_address: Option<String>,
}

impl Default for ChangeOfAddressStatus {
    fn default() -> Self {
        Self {
            has_active_change: false,
            effective_date: None,
            forwarding_address: None,
        }
    }
}

/// Confirmation returned by a change-of-address submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ChangeOfAddressReceipt {
    #[serde(default)]
    pub confirmation_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Latest tracking snapshot for a package.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct TrackingInfo {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub estimated_delivery: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}
