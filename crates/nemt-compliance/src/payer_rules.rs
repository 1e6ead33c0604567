//! UnitedHealthcare Community & State business rules.
//!
//! These run over the claim document rather than the EDI text: they catch
//! data a payer rejects or delays even when the interchange is structurally
//! valid. ERROR findings mean the payer will reject the claim.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info_span};

use nemt_model::{Claim, Severity};

use crate::report::ComplianceIssue;

/// Ambulance HCPCS billed without an ambulance block.
pub const AMBULANCE_DATA_REQUIRED: &str = "UHC_001";
/// No network indicator.
pub const NETWORK_INDICATOR: &str = "UHC_003";
/// No submission channel.
pub const SUBMISSION_CHANNEL: &str = "UHC_004";
/// Member group lacks group or plan id.
pub const MEMBER_GROUP: &str = "UHC_005";
/// Ambulance block lacks patient weight.
pub const PATIENT_WEIGHT: &str = "UHC_006";
/// Ambulance block lacks transport code.
pub const TRANSPORT_CODE: &str = "UHC_007";
/// Ambulance block lacks transport reason.
pub const TRANSPORT_REASON: &str = "UHC_008";
/// Ambulance block lacks trip number.
pub const TRIP_NUMBER: &str = "UHC_009";
/// Trip type outside I/R/B.
pub const TRIP_TYPE: &str = "UHC_010";
/// Trip leg outside A/B.
pub const TRIP_LEG: &str = "UHC_011";
/// No pickup or dropoff at either level.
pub const LOCATION_MISSING: &str = "UHC_012";
/// No authorization number.
pub const AUTHORIZATION: &str = "UHC_013";
/// No patient account number.
pub const PATIENT_ACCOUNT: &str = "UHC_014";
/// HCPCS that needs a supervising or attendant provider has none.
pub const SUPERVISING_REQUIRED: &str = "UHC_020";

/// Ambulance and NEMT transport HCPCS codes.
pub const AMBULANCE_CODES: &[&str] = &[
    "A0130", "A0140", "A0160", "A0170", "A0180", "A0190", "A0200", "A0210", "A0225", "A0380",
    "A0382", "A0384", "A0390", "A0392", "A0394", "A0396", "A0398", "A0420", "A0422", "A0424",
    "A0425", "A0426", "A0427", "A0428", "A0429", "A0430", "A0431", "A0432", "A0433", "A0434",
    "A0435", "A0436",
];

/// HCPCS codes billed with a supervising or attendant provider.
pub const SUPERVISED_CODES: &[&str] = &[
    "A0090", "A0100", "A0110", "A0120", "A0140", "A0160", "A0170", "A0180", "A0190", "A0200",
    "A0210", "T2001",
];

const TRIP_TYPES: &[&str] = &["I", "R", "B"];
const TRIP_LEGS: &[&str] = &["A", "B"];

fn has_code(codes: &[&str], hcpcs: &str) -> bool {
    codes.contains(&hcpcs.trim().to_ascii_uppercase().as_str())
}

fn blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Findings for one claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PayerRuleReport {
    pub claim_number: String,
    issues: Vec<ComplianceIssue>,
}

impl PayerRuleReport {
    #[must_use]
    pub fn new(claim_number: impl Into<String>) -> Self {
        Self {
            claim_number: claim_number.into(),
            issues: Vec::new(),
        }
    }

    fn add(&mut self, issue: ComplianceIssue) {
        self.issues.push(issue);
    }

    /// Passes when no ERROR was found.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    #[must_use]
    pub fn issues(&self) -> &[ComplianceIssue] {
        &self.issues
    }

    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    #[must_use]
    pub fn codes(&self) -> Vec<&'static str> {
        self.issues.iter().map(|i| i.code).collect()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }
}

impl fmt::Display for PayerRuleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UHC business rules for {}: {}",
            self.claim_number,
            if self.is_compliant() { "PASS" } else { "FAIL" }
        )?;
        for issue in &self.issues {
            write!(f, "\n  {issue}")?;
        }
        Ok(())
    }
}

/// Run the UHC business rules over a claim document.
#[must_use]
pub fn check_uhc_rules(claim: &Claim) -> PayerRuleReport {
    let _span = info_span!("uhc_rules", claim_number = %claim.claim.claim_number).entered();
    let mut report = PayerRuleReport::new(&claim.claim.claim_number);
    ambulance_required(claim, &mut report);
    tracking_fields(claim, &mut report);
    member_group(claim, &mut report);
    ambulance_block(claim, &mut report);
    trip_details(claim, &mut report);
    authorization(claim, &mut report);
    supervising(claim, &mut report);
    debug!(issues = report.issues.len(), "uhc rules complete");
    report
}

fn ambulance_required(claim: &Claim, report: &mut PayerRuleReport) {
    let bills_transport = claim
        .services
        .iter()
        .any(|line| has_code(AMBULANCE_CODES, &line.hcpcs));
    if bills_transport && claim.claim.ambulance.is_none() {
        report.add(
            ComplianceIssue::error(
                AMBULANCE_DATA_REQUIRED,
                "ambulance HCPCS codes require ambulance data",
            )
            .on_field("claim.ambulance")
            .expected("ambulance data with transport information", "missing"),
        );
    }
}

fn tracking_fields(claim: &Claim, report: &mut PayerRuleReport) {
    if claim.claim.network_indicator.is_none() {
        report.add(
            ComplianceIssue::warning(NETWORK_INDICATOR, "network indicator (I/O) recommended")
                .on_field("claim.rendering_network_indicator")
                .expected("I or O", "missing"),
        );
    }
    if claim.claim.submission_channel.is_none() {
        report.add(
            ComplianceIssue::info(
                SUBMISSION_CHANNEL,
                "submission channel (ELECTRONIC/PAPER) helps tracking",
            )
            .on_field("claim.submission_channel")
            .expected("ELECTRONIC or PAPER", "missing"),
        );
    }
}

fn member_group(claim: &Claim, report: &mut PayerRuleReport) {
    let group = claim.claim.member_group.as_ref();
    let mut missing = Vec::new();
    if blank(group.map(|g| g.group_id.as_str())) {
        missing.push("group_id");
    }
    if blank(group.map(|g| g.plan_id.as_str())) {
        missing.push("plan_id");
    }
    if !missing.is_empty() {
        let missing = missing.join(", ");
        report.add(
            ComplianceIssue::warning(
                MEMBER_GROUP,
                format!("member group details missing: {missing}"),
            )
            .on_field("claim.member_group")
            .expected("group_id, plan_id", format!("missing {missing}")),
        );
    }
}

fn ambulance_block(claim: &Claim, report: &mut PayerRuleReport) {
    let Some(ambulance) = &claim.claim.ambulance else {
        return;
    };
    if ambulance.patient_weight.is_none_or(|w| w <= 0.0) {
        report.add(
            ComplianceIssue::warning(PATIENT_WEIGHT, "patient weight recommended")
                .on_field("claim.ambulance.patient_weight")
                .expected("weight in pounds or kilograms", "missing"),
        );
    }
    if blank(ambulance.transport_code.as_deref()) {
        report.add(
            ComplianceIssue::error(TRANSPORT_CODE, "transport code required")
                .on_field("claim.ambulance.transport_code")
                .expected("A, B, C, D or E", "missing"),
        );
    }
    if blank(ambulance.transport_reason.as_deref()) {
        report.add(
            ComplianceIssue::error(TRANSPORT_REASON, "transport reason required")
                .on_field("claim.ambulance.transport_reason")
                .expected("A, B, C, D, DH or E", "missing"),
        );
    }
    if ambulance.trip_number.is_none() {
        report.add(
            ComplianceIssue::warning(TRIP_NUMBER, "trip number recommended for tracking")
                .on_field("claim.ambulance.trip_number")
                .expected("unique trip identifier", "missing"),
        );
    }
}

fn trip_details(claim: &Claim, report: &mut PayerRuleReport) {
    let claim_locations = claim
        .claim
        .ambulance
        .as_ref()
        .is_some_and(|a| a.pickup.is_some() || a.dropoff.is_some());
    for (index, line) in claim.services.iter().enumerate() {
        if let Some(trip_type) = line.trip.trip_type.as_deref()
            && !TRIP_TYPES.contains(&trip_type)
        {
            report.add(
                ComplianceIssue::error(TRIP_TYPE, "invalid trip type")
                    .on_field(format!("services[{index}].trip_type"))
                    .expected("I, R or B", trip_type),
            );
        }
        if let Some(trip_leg) = line.trip.trip_leg.as_deref()
            && !TRIP_LEGS.contains(&trip_leg)
        {
            report.add(
                ComplianceIssue::error(TRIP_LEG, "invalid trip leg")
                    .on_field(format!("services[{index}].trip_leg"))
                    .expected("A or B", trip_leg),
            );
        }
        if line.pickup.is_none() && line.dropoff.is_none() && !claim_locations {
            report.add(
                ComplianceIssue::warning(LOCATION_MISSING, "pickup or dropoff location recommended")
                    .on_field(format!("services[{index}].pickup"))
                    .expected("pickup and/or dropoff", "missing at claim and service level"),
            );
        }
    }
}

fn authorization(claim: &Claim, report: &mut PayerRuleReport) {
    if blank(claim.claim.authorization.as_deref()) {
        report.add(
            ComplianceIssue::warning(AUTHORIZATION, "authorization number recommended")
                .on_field("claim.auth_number")
                .expected("prior authorization number", "missing"),
        );
    }
    if blank(claim.claim.patient_account.as_deref()) {
        report.add(
            ComplianceIssue::info(PATIENT_ACCOUNT, "patient account number helps tracking")
                .on_field("claim.patient_account")
                .expected("provider patient account number", "missing"),
        );
    }
}

fn supervising(claim: &Claim, report: &mut PayerRuleReport) {
    let claim_level = claim.claim.supervising_provider.is_some();
    for (index, line) in claim.services.iter().enumerate() {
        if has_code(SUPERVISED_CODES, &line.hcpcs)
            && line.supervising_provider.is_none()
            && !claim_level
        {
            report.add(
                ComplianceIssue::error(
                    SUPERVISING_REQUIRED,
                    format!(
                        "HCPCS {} requires a supervising or attendant provider",
                        line.hcpcs
                    ),
                )
                .on_field(format!("services[{index}].supervising_provider"))
                .expected("supervising provider (NPI, name)", "missing"),
            );
        }
    }
}
