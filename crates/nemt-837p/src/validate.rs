//! Pre-encoding claim validation.
//!
//! Validation runs before any segment is written. A validator returns the
//! non-fatal findings it wants logged, or a [`ValidationError`] that stops the
//! claim from being encoded.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use nemt_model::codes::{STATE_CODES, is_place_of_service};
use nemt_model::{Claim, Severity};

use crate::error::{FieldIssue, ValidationError};

static NPI: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d{10}$").ok());
static TAX_ID: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d{9}$").ok());
static ZIP: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").ok());

fn matches(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

/// Decides whether a claim may be encoded.
pub trait ClaimValidator: Send + Sync {
    /// Return warnings to log, or the error that rejects the claim.
    fn validate(&self, claim: &Claim) -> Result<Vec<FieldIssue>, ValidationError>;
}

/// Rules the encoder applies regardless of the configured validator.
///
/// A replacement or void must carry the claim it acts on, and a claim needs at
/// least one service line.
pub fn encoder_prerequisites(claim: &Claim) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    let frequency = claim.claim.resolved_frequency();
    if frequency.requires_original_reference() && claim.claim.original_reference().is_none() {
        issues.push(FieldIssue::error(
            "VAL_039",
            "claim.original_claim_number",
            format!("frequency code {frequency} requires an original claim reference"),
        ));
    }
    if claim.services.is_empty() {
        issues.push(FieldIssue::error(
            "VAL_040",
            "services",
            "at least one service line is required",
        ));
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(&claim.claim.claim_number, issues))
    }
}

/// Field-level rules for billing provider, subscriber, claim and services.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValidator;

impl FieldValidator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Every finding, errors and warnings alike.
    #[must_use]
    pub fn collect(&self, claim: &Claim) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        check_billing_provider(claim, &mut issues);
        check_subscriber(claim, &mut issues);
        check_claim_header(claim, &mut issues);
        check_services(claim, &mut issues);
        issues
    }
}

impl ClaimValidator for FieldValidator {
    fn validate(&self, claim: &Claim) -> Result<Vec<FieldIssue>, ValidationError> {
        let issues = self.collect(claim);
        if issues.iter().any(|i| i.severity == Severity::Error) {
            return Err(ValidationError::new(&claim.claim.claim_number, issues));
        }
        for issue in &issues {
            warn!(code = %issue.code, field = %issue.field, "{}", issue.message);
        }
        Ok(issues)
    }
}

fn required_with_max(
    issues: &mut Vec<FieldIssue>,
    value: &str,
    field: &str,
    label: &str,
    codes: (&str, &str),
    max: usize,
) {
    let value = value.trim();
    if value.is_empty() {
        issues.push(FieldIssue::error(codes.0, field, format!("{label} is required")));
    } else if value.chars().count() > max {
        issues.push(FieldIssue::error(
            codes.1,
            field,
            format!("{label} exceeds {max} characters"),
        ));
    }
}

fn check_billing_provider(claim: &Claim, issues: &mut Vec<FieldIssue>) {
    let provider = &claim.billing_provider;
    let npi = provider.npi.trim();
    if npi.is_empty() {
        issues.push(FieldIssue::error(
            "VAL_001",
            "billing_provider.npi",
            "billing provider NPI is required",
        ));
    } else if !matches(&NPI, npi) {
        issues.push(FieldIssue::error(
            "VAL_002",
            "billing_provider.npi",
            format!("billing provider NPI '{npi}' must be 10 digits"),
        ));
    }
    required_with_max(
        issues,
        &provider.name,
        "billing_provider.name",
        "billing provider name",
        ("VAL_003", "VAL_004"),
        60,
    );
    let address = &provider.address;
    required_with_max(
        issues,
        &address.line1,
        "billing_provider.address.line1",
        "billing provider address",
        ("VAL_005", "VAL_006"),
        55,
    );
    required_with_max(
        issues,
        &address.city,
        "billing_provider.address.city",
        "billing provider city",
        ("VAL_007", "VAL_008"),
        30,
    );
    let state = address.state.trim();
    if state.is_empty() {
        issues.push(FieldIssue::error(
            "VAL_009",
            "billing_provider.address.state",
            "billing provider state is required",
        ));
    } else if !STATE_CODES.contains(&state.to_ascii_uppercase().as_str()) {
        issues.push(FieldIssue::error(
            "VAL_010",
            "billing_provider.address.state",
            format!("'{state}' is not a valid state code"),
        ));
    }
    let zip = address.zip.trim();
    if zip.is_empty() {
        issues.push(FieldIssue::error(
            "VAL_011",
            "billing_provider.address.zip",
            "billing provider ZIP is required",
        ));
    } else if !matches(&ZIP, zip) {
        issues.push(FieldIssue::error(
            "VAL_012",
            "billing_provider.address.zip",
            format!("ZIP '{zip}' must be 12345 or 12345-6789"),
        ));
    }
    if let Some(tax_id) = provider.tax_id.as_deref().map(str::trim)
        && !tax_id.is_empty()
        && !matches(&TAX_ID, tax_id)
    {
        issues.push(FieldIssue::error(
            "VAL_013",
            "billing_provider.tax_id",
            "tax id must be 9 digits",
        ));
    }
}

fn check_subscriber(claim: &Claim, issues: &mut Vec<FieldIssue>) {
    let subscriber = &claim.subscriber;
    required_with_max(
        issues,
        &subscriber.member_id,
        "subscriber.member_id",
        "member id",
        ("VAL_020", "VAL_021"),
        80,
    );
    required_with_max(
        issues,
        &subscriber.name.last,
        "subscriber.name.last",
        "subscriber last name",
        ("VAL_022", "VAL_023"),
        60,
    );
    required_with_max(
        issues,
        &subscriber.name.first,
        "subscriber.name.first",
        "subscriber first name",
        ("VAL_024", "VAL_025"),
        35,
    );
}

fn check_claim_header(claim: &Claim, issues: &mut Vec<FieldIssue>) {
    let header = &claim.claim;
    required_with_max(
        issues,
        &header.claim_number,
        "claim.clm_number",
        "claim number",
        ("VAL_030", "VAL_031"),
        30,
    );
    let frequency = header.resolved_frequency();
    if header.total_charge <= 0.0 && frequency != nemt_model::FrequencyCode::Void {
        issues.push(FieldIssue::error(
            "VAL_033",
            "claim.total_charge",
            "total charge must be greater than zero",
        ));
    }
    if header.from.is_none() {
        issues.push(FieldIssue::error(
            "VAL_034",
            "claim.from",
            "service date is required",
        ));
    }
    if !is_place_of_service(header.place_of_service.trim()) {
        issues.push(FieldIssue::error(
            "VAL_037",
            "claim.pos",
            format!("'{}' is not a valid place of service", header.place_of_service),
        ));
    }
    if frequency.requires_original_reference() && header.original_reference().is_none() {
        issues.push(FieldIssue::error(
            "VAL_039",
            "claim.original_claim_number",
            format!("frequency code {frequency} requires an original claim reference"),
        ));
    }
    if !claim.services.is_empty() && !claim.total_matches_lines() {
        issues.push(FieldIssue::warning(
            "VAL_050",
            "claim.total_charge",
            format!(
                "total charge {:.2} does not match service line sum {:.2}",
                header.total_charge,
                claim.service_total()
            ),
        ));
    }
}

fn check_services(claim: &Claim, issues: &mut Vec<FieldIssue>) {
    if claim.services.is_empty() {
        issues.push(FieldIssue::error(
            "VAL_040",
            "services",
            "at least one service line is required",
        ));
        return;
    }
    for (idx, line) in claim.services.iter().enumerate() {
        let n = idx + 1;
        required_with_max(
            issues,
            &line.hcpcs,
            &format!("services[{idx}].hcpcs"),
            &format!("service line {n} HCPCS code"),
            ("VAL_041", "VAL_042"),
            5,
        );
        if line.charge < 0.0 {
            issues.push(FieldIssue::error(
                "VAL_043",
                format!("services[{idx}].charge"),
                format!("service line {n} charge cannot be negative"),
            ));
        }
        if line.modifiers.len() > 4 {
            issues.push(FieldIssue::error(
                "VAL_044",
                format!("services[{idx}].modifiers"),
                format!("service line {n} has more than 4 modifiers"),
            ));
        }
        for modifier in &line.modifiers {
            if modifier.trim().chars().count() != 2 {
                issues.push(FieldIssue::error(
                    "VAL_045",
                    format!("services[{idx}].modifiers"),
                    format!("service line {n} modifier '{modifier}' must be 2 characters"),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use nemt_model::{
        Address, BillingProvider, ClaimHeader, FrequencyCode, PersonName, ServiceLine, Subscriber,
    };

    use super::*;

    fn valid_claim() -> Claim {
        Claim {
            billing_provider: BillingProvider {
                npi: "1234567890".to_string(),
                name: "ACME TRANSPORT".to_string(),
                tax_id: Some("123456789".to_string()),
                taxonomy: None,
                address: Address {
                    line1: "1 Main St".to_string(),
                    line2: None,
                    city: "Louisville".to_string(),
                    state: "KY".to_string(),
                    zip: "40202".to_string(),
                },
            },
            subscriber: Subscriber {
                member_id: "M123456789".to_string(),
                name: PersonName {
                    last: "DOE".to_string(),
                    first: "JANE".to_string(),
                },
                ..Subscriber::default()
            },
            claim: ClaimHeader {
                claim_number: "CLM1".to_string(),
                total_charge: 50.0,
                from: NaiveDate::from_ymd_opt(2026, 1, 1),
                ..ClaimHeader::default()
            },
            services: vec![ServiceLine::new("A0130", 50.0)],
            ..Claim::default()
        }
    }

    #[test]
    fn valid_claim_has_no_issues() {
        assert!(FieldValidator::new().collect(&valid_claim()).is_empty());
        assert!(encoder_prerequisites(&valid_claim()).is_ok());
    }

    #[test]
    fn bad_npi_and_zip_are_errors() {
        let mut claim = valid_claim();
        claim.billing_provider.npi = "12345".to_string();
        claim.billing_provider.address.zip = "4020".to_string();
        let err = FieldValidator::new().validate(&claim).unwrap_err();
        assert!(err.has_code("VAL_002"));
        assert!(err.has_code("VAL_012"));
    }

    #[test]
    fn nine_digit_zip_is_accepted() {
        let mut claim = valid_claim();
        claim.billing_provider.address.zip = "40202-1234".to_string();
        assert!(FieldValidator::new().validate(&claim).is_ok());
    }

    #[test]
    fn total_mismatch_is_only_a_warning() {
        let mut claim = valid_claim();
        claim.claim.total_charge = 75.0;
        let issues = FieldValidator::new().validate(&claim).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "VAL_050");
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn void_may_have_zero_total() {
        let mut claim = valid_claim();
        claim.claim.frequency_code = Some(FrequencyCode::Void);
        claim.claim.original_claim_number = Some("ORIG1".to_string());
        claim.claim.total_charge = 0.0;
        claim.services[0].charge = 0.0;
        assert!(FieldValidator::new().validate(&claim).is_ok());
    }

    #[test]
    fn replacement_without_reference_fails_prerequisites() {
        let mut claim = valid_claim();
        claim.claim.frequency_code = Some(FrequencyCode::Replacement);
        let err = encoder_prerequisites(&claim).unwrap_err();
        assert!(err.has_code("VAL_039"));
    }

    #[test]
    fn modifiers_are_limited() {
        let mut claim = valid_claim();
        claim.services[0].modifiers = ["U1", "U2", "U3", "U4", "XYZ"]
            .into_iter()
            .map(String::from)
            .collect();
        let err = FieldValidator::new().validate(&claim).unwrap_err();
        assert!(err.has_code("VAL_044"));
        assert!(err.has_code("VAL_045"));
    }
}
