//! Raw payload decoding and normalization.
//!
//! The cache stores raw agency payloads, so the same decoding path
//! serves both a live response and a cache fallback. Types in
//! [`crate::responses`] that rename only on serialization decode raw
//! payloads directly; the shapes that genuinely differ from the wire
//! are handled here.

use serde::Deserialize;
use serde_json::Value;

use crate::responses::{
    AddressValidation, ChangeOfAddressStatus, DisabilityCredit, DisabilityCreditRecord,
    DmvApiResponse, IrsApiResponse, MedicalDeduction, MedicalDeductionRecord, SsaApiResponse,
    UspsApiResponse,
};

/// Raw IRS taxpayer payload. The wire calls adjusted gross income `agi`.
#[derive(Debug, Deserialize)]
struct RawIrsTaxInfo {
    taxpayer_id: String,
    tax_year: i32,
    filing_status: String,
    agi: f64,
    tax_liability: f64,
    #[serde(default)]
    refund_amount: Option<f64>,
    #[serde(default)]
    disability_credits: Vec<DisabilityCredit>,
    #[serde(default)]
    medical_deductions: Vec<MedicalDeduction>,
    last_updated: String,
}

pub(crate) fn irs_tax_info(raw: &Value) -> Result<IrsApiResponse, serde_json::Error> {
    let data: RawIrsTaxInfo = serde_json::from_value(raw.clone())?;
    Ok(IrsApiResponse {
        taxpayer_id: data.taxpayer_id,
        tax_year: data.tax_year,
        filing_status: data.filing_status,
        adjusted_gross_income: data.agi,
        tax_liability: data.tax_liability,
        refund_amount: data.refund_amount,
        disability_credits: data.disability_credits,
        medical_deductions: data.medical_deductions,
        last_updated: data.last_updated,
    })
}

/// Envelope around the dedicated credits endpoint.
#[derive(Debug, Deserialize)]
struct CreditsEnvelope {
    #[serde(default)]
    credits: Vec<DisabilityCreditRecord>,
}

pub(crate) fn irs_disability_credits(
    raw: &Value,
) -> Result<Vec<DisabilityCreditRecord>, serde_json::Error> {
    let envelope: CreditsEnvelope = serde_json::from_value(raw.clone())?;
    Ok(envelope.credits)
}

/// Envelope around the dedicated deductions endpoint.
#[derive(Debug, Deserialize)]
struct DeductionsEnvelope {
    #[serde(default)]
    deductions: Vec<MedicalDeductionRecord>,
}

pub(crate) fn irs_medical_deductions(
    raw: &Value,
) -> Result<Vec<MedicalDeductionRecord>, serde_json::Error> {
    let envelope: DeductionsEnvelope = serde_json::from_value(raw.clone())?;
    Ok(envelope.deductions)
}

/// Whether a deduction relates to hearing loss. Only these are
/// persisted from the deductions endpoint; the full list is still
/// returned to the caller.
pub(crate) fn is_hearing_related(deduction: &MedicalDeductionRecord) -> bool {
    let description = deduction.description.to_lowercase();
    deduction.category.contains("hearing")
        || description.contains("cochlear")
        || description.contains("hearing aid")
}

pub(crate) fn ssa_benefits(raw: &Value) -> Result<SsaApiResponse, serde_json::Error> {
    serde_json::from_value(raw.clone())
}

/// The SSA benefits payload also carries the effective date used for
/// the benefit history trail; the normalized response does not.
pub(crate) fn ssa_effective_date(raw: &Value) -> Option<&str> {
    raw.get("effective_date").and_then(Value::as_str)
}

pub(crate) fn dmv_license(raw: &Value) -> Result<DmvApiResponse, serde_json::Error> {
    serde_json::from_value(raw.clone())
}

/// Raw USPS validation payload. The normalized response regroups these
/// flat fields under `addressValidation`.
#[derive(Debug, Deserialize)]
struct RawAddressValidation {
    valid: bool,
    standardized_address: String,
    delivery_point: String,
    zip_plus_4: String,
    #[serde(default)]
    change_of_address: Option<ChangeOfAddressStatus>,
}

pub(crate) fn usps_validation(raw: &Value) -> Result<UspsApiResponse, serde_json::Error> {
    let data: RawAddressValidation = serde_json::from_value(raw.clone())?;
    Ok(UspsApiResponse {
        address_validation: AddressValidation {
            is_valid: data.valid,
            standardized_address: data.standardized_address,
            delivery_point: data.delivery_point,
            zip_plus4: data.zip_plus_4,
        },
        change_of_address: data.change_of_address.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn irs_payload_is_normalized() {
        let raw = json!({
            "taxpayer_id": "TP-1001",
            "tax_year": 2023,
            "filing_status": "single",
            "agi": 48250.0,
            "tax_liability": 5120.0,
            "disability_credits": [
                {"creditType": "disability_access", "amount": 500.0,
                 "eligibilityReason": "hearing impairment"}
            ],
            "medical_deductions": [
                {"category": "hearing_aids", "amount": 3200.0,
                 "description": "Bilateral hearing aids"}
            ],
            "last_updated": "2024-02-01"
        });

        let info = irs_tax_info(&raw).unwrap();
        assert_eq!(info.taxpayer_id, "TP-1001");
        assert_eq!(info.adjusted_gross_income, 48250.0);
        assert_eq!(info.refund_amount, None);
        assert_eq!(info.disability_credits[0].credit_type, "disability_access");
        assert_eq!(info.medical_deductions[0].category, "hearing_aids");
    }

    #[test]
    fn irs_normalized_serializes_camel_case() {
        let raw = json!({
            "taxpayer_id": "TP-1001",
            "tax_year": 2023,
            "filing_status": "single",
            "agi": 48250.0,
            "tax_liability": 5120.0,
            "refund_amount": 310.0,
            "last_updated": "2024-02-01"
        });

        let out = serde_json::to_value(irs_tax_info(&raw).unwrap()).unwrap();
        assert_eq!(out["adjustedGrossIncome"], 48250.0);
        assert_eq!(out["refundAmount"], 310.0);
        assert!(out.get("agi").is_none());
        // Missing arrays normalize to empty, matching the contract.
        assert_eq!(out["disabilityCredits"], json!([]));
    }

    #[test]
    fn credits_envelope_unwraps() {
        let raw = json!({
            "credits": [
                {"creditType": "elderly_disabled", "amount": 750.0,
                 "taxYear": 2023, "eligibilityReason": "SSDI recipient"}
            ]
        });
        let credits = irs_disability_credits(&raw).unwrap();
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].tax_year, 2023);
    }

    #[test]
    fn hearing_filter_matches_category_and_description() {
        let base = MedicalDeductionRecord {
            category: "equipment".into(),
            amount: 100.0,
            description: "Wheelchair ramp".into(),
            tax_year: 2023,
        };
        assert!(!is_hearing_related(&base));

        let by_category = MedicalDeductionRecord {
            category: "hearing_aids".into(),
            ..base.clone()
        };
        assert!(is_hearing_related(&by_category));

        let by_description = MedicalDeductionRecord {
            description: "Cochlear implant maintenance".into(),
            ..base.clone()
        };
        assert!(is_hearing_related(&by_description));

        let by_phrase = MedicalDeductionRecord {
            description: "Replacement Hearing Aid batteries".into(),
            ..base
        };
        assert!(is_hearing_related(&by_phrase));
    }

    #[test]
    fn ssa_payload_is_normalized() {
        let raw = json!({
            "beneficiary_id": "BEN-22",
            "benefit_type": "SSDI",
            "monthly_benefit": 1450.0,
            "disability_onset_date": "2019-06-01",
            "review_date": "2026-06-01",
            "work_credits": 32,
            "medical_review_schedule": "every-3-years",
            "representative_payee": {"name": "Dana Ortiz", "relationship": "sibling"},
            "last_updated": "2024-03-10",
            "effective_date": "2020-01-01"
        });

        let benefits = ssa_benefits(&raw).unwrap();
        assert_eq!(benefits.benefit_type.as_str(), "SSDI");
        assert_eq!(
            benefits.representative_payee.as_ref().unwrap().name,
            "Dana Ortiz"
        );
        assert_eq!(ssa_effective_date(&raw), Some("2020-01-01"));

        let out = serde_json::to_value(&benefits).unwrap();
        assert_eq!(out["monthlyBenefit"], 1450.0);
        assert_eq!(out["benefitType"], "SSDI");
    }

    #[test]
    fn dmv_payload_defaults_missing_collections() {
        let raw = json!({
            "license_number": "D1234567",
            "state": "CA",
            "license_type": "standard",
            "expiration_date": "2027-08-01",
            "real_id_compliant": true,
            "last_updated": "2024-01-15"
        });

        let license = dmv_license(&raw).unwrap();
        assert!(license.restrictions.is_empty());
        assert!(license.disability_accommodations.is_empty());

        let out = serde_json::to_value(&license).unwrap();
        assert_eq!(out["licenseNumber"], "D1234567");
        assert_eq!(out["realIdCompliant"], true);
    }

    #[test]
    fn dmv_accommodation_items_keep_wire_names() {
        let raw = json!({
            "license_number": "D1234567",
            "state": "CA",
            "license_type": "standard",
            "expiration_date": "2027-08-01",
            "disability_accommodations": [
                {"type": "hearing_impaired", "description": "Deaf or hard of hearing",
                 "validUntil": "2027-08-01"}
            ],
            "real_id_compliant": false,
            "last_updated": "2024-01-15"
        });

        let license = dmv_license(&raw).unwrap();
        assert_eq!(license.disability_accommodations[0].kind, "hearing_impaired");
        assert_eq!(
            license.disability_accommodations[0].valid_until,
            "2027-08-01"
        );
    }

    #[test]
    fn usps_validation_regroups_fields() {
        let raw = json!({
            "valid": true,
            "standardized_address": "123 MAIN ST, SPRINGFIELD, IL 62701-1234",
            "delivery_point": "23",
            "zip_plus_4": "62701-1234"
        });

        let result = usps_validation(&raw).unwrap();
        assert!(result.address_validation.is_valid);
        assert!(!result.change_of_address.has_active_change);

        let out = serde_json::to_value(&result).unwrap();
        assert_eq!(out["addressValidation"]["zipPlus4"], "62701-1234");
        assert_eq!(out["changeOfAddress"]["hasActiveChange"], false);
    }

    #[test]
    fn usps_active_forwarding_is_preserved() {
        let raw = json!({
            "valid": true,
            "standardized_address": "500 OAK AVE, DENVER, CO 80203-2210",
            "delivery_point": "10",
            "zip_plus_4": "80203-2210",
            "change_of_address": {
                "hasActiveChange": true,
                "effectiveDate": "2024-05-01",
                "forwardingAddress": "77 PINE RD, BOULDER, CO 80302"
            }
        });

        let result = usps_validation(&raw).unwrap();
        assert!(result.change_of_address.has_active_change);
        assert_eq!(
            result.change_of_address.forwarding_address.as_deref(),
            Some("77 PINE RD, BOULDER, CO 80302")
        );
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let raw = json!({"taxpayer_id": "TP-1001"});
        assert!(irs_tax_info(&raw).is_err());
    }
}
