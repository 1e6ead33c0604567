//! UHC business rules over claim documents.

use nemt_compliance::check_uhc_rules;
use nemt_compliance::payer_rules::{
    AMBULANCE_DATA_REQUIRED, AUTHORIZATION, LOCATION_MISSING, MEMBER_GROUP, NETWORK_INDICATOR,
    PATIENT_ACCOUNT, PATIENT_WEIGHT, SUBMISSION_CHANNEL, SUPERVISING_REQUIRED, TRANSPORT_CODE,
    TRANSPORT_REASON, TRIP_LEG, TRIP_NUMBER, TRIP_TYPE,
};
use nemt_model::{Claim, ProviderRef, Severity};

fn complete_claim() -> Claim {
    serde_json::from_value(serde_json::json!({
        "billing_provider": {"npi": "1234567890", "name": "ACME TRANSPORT"},
        "subscriber": {"member_id": "M1", "name": {"last": "DOE", "first": "JANE"}},
        "claim": {
            "clm_number": "CLM1",
            "total_charge": 65.0,
            "from": "2026-01-01",
            "auth_number": "AUTH9",
            "patient_account": "PA1",
            "network_indicator": "I",
            "submission_channel": "ELECTRONIC",
            "member_group": {
                "group_id": "G1", "sub_group_id": "", "class_id": "", "plan_id": "P1", "product_id": ""
            },
            "ambulance": {
                "patient_weight": 175,
                "transport_code": "A",
                "transport_reason": "DH",
                "trip_number": 42,
                "pickup": {"line1": "1 Main St", "city": "Louisville", "state": "KY", "zip": "40201"}
            }
        },
        "services": [
            {"hcpcs": "A0130", "charge": 50.0, "trip_type": "I", "trip_leg": "A"},
            {"hcpcs": "T2049", "charge": 15.0, "units": 6}
        ]
    }))
    .expect("parse claim")
}

#[test]
fn complete_claim_passes_cleanly() {
    let report = check_uhc_rules(&complete_claim());
    assert!(report.is_compliant());
    assert!(report.issues().is_empty(), "{report}");
}

#[test]
fn ambulance_codes_require_ambulance_data() {
    let mut claim = complete_claim();
    claim.claim.ambulance = None;
    let report = check_uhc_rules(&claim);
    assert!(!report.is_compliant());
    assert!(report.has_code(AMBULANCE_DATA_REQUIRED));
    assert!(report.has_code(LOCATION_MISSING));
    assert!(!report.has_code(TRANSPORT_CODE));
}

#[test]
fn incomplete_ambulance_block() {
    let mut claim = complete_claim();
    if let Some(ambulance) = claim.claim.ambulance.as_mut() {
        ambulance.patient_weight = None;
        ambulance.transport_code = None;
        ambulance.transport_reason = Some(" ".to_string());
        ambulance.trip_number = None;
    }
    let report = check_uhc_rules(&claim);
    assert_eq!(
        report.codes(),
        vec![PATIENT_WEIGHT, TRANSPORT_CODE, TRANSPORT_REASON, TRIP_NUMBER]
    );
    assert_eq!(report.error_count(), 2);
}

#[test]
fn tracking_fields_are_recommended() {
    let mut claim = complete_claim();
    claim.claim.network_indicator = None;
    claim.claim.submission_channel = None;
    claim.claim.authorization = None;
    claim.claim.patient_account = None;
    claim.claim.member_group = None;
    let report = check_uhc_rules(&claim);
    assert!(report.is_compliant());
    assert_eq!(
        report.codes(),
        vec![
            NETWORK_INDICATOR,
            SUBMISSION_CHANNEL,
            MEMBER_GROUP,
            AUTHORIZATION,
            PATIENT_ACCOUNT
        ]
    );
    let channel = &report.issues()[1];
    assert_eq!(channel.severity, Severity::Info);
    assert_eq!(channel.field.as_deref(), Some("claim.submission_channel"));
}

#[test]
fn member_group_names_missing_ids() {
    let mut claim = complete_claim();
    if let Some(group) = claim.claim.member_group.as_mut() {
        group.plan_id.clear();
    }
    let report = check_uhc_rules(&claim);
    let issue = &report.issues()[0];
    assert_eq!(issue.code, MEMBER_GROUP);
    assert_eq!(issue.actual.as_deref(), Some("missing plan_id"));
}

#[test]
fn invalid_trip_type_and_leg_are_errors() {
    let mut claim = complete_claim();
    claim.services[1].trip.trip_type = Some("X".to_string());
    claim.services[1].trip.trip_leg = Some("C".to_string());
    let report = check_uhc_rules(&claim);
    assert_eq!(report.codes(), vec![TRIP_TYPE, TRIP_LEG]);
    assert_eq!(report.issues()[0].field.as_deref(), Some("services[1].trip_type"));
    assert_eq!(report.issues()[1].actual.as_deref(), Some("C"));
}

#[test]
fn supervised_codes_need_a_supervising_provider() {
    let mut claim = complete_claim();
    claim.services[0].hcpcs = "T2001".to_string();
    let report = check_uhc_rules(&claim);
    assert_eq!(report.codes(), vec![SUPERVISING_REQUIRED]);
    assert_eq!(
        report.issues()[0].field.as_deref(),
        Some("services[0].supervising_provider")
    );

    claim.claim.supervising_provider = Some(ProviderRef::person("1111111111", "DRIVER", "DAN"));
    assert!(check_uhc_rules(&claim).issues().is_empty());
}
