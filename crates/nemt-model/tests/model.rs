//! Tests for nemt-model types.

use chrono::NaiveDate;
use nemt_model::{
    AdjustmentType, Claim, ClaimHeader, FrequencyCode, PaymentStatus, PayerProfile, ServiceLine,
    Trip, is_mileage_code,
};

const CLAIM_JSON: &str = r#"{
    "billing_provider": {
        "npi": "1234567890",
        "name": "ACME TRANSPORT",
        "address": {"line1": "1 Depot Rd", "city": "Louisville", "state": "KY", "zip": "40201"}
    },
    "subscriber": {"member_id": "M1", "name": {"last": "DOE", "first": "JANE"}},
    "claim": {
        "clm_number": "CLM1",
        "total_charge": 65.0,
        "from": "2026-01-01",
        "payment_status": "denied",
        "auth_number": "AUTH9",
        "ambulance": {"trip_number": 42, "patient_weight_lbs": 180}
    },
    "services": [
        {"hcpcs": "A0130", "charge": 50.0, "trip_leg": "A", "vas_indicator": true},
        {"hcpcs": "T2049", "charge": 15.0, "units": 6, "pos": "99", "payment_status": "P"}
    ]
}"#;

fn claim() -> Claim {
    serde_json::from_str(CLAIM_JSON).expect("parse claim")
}

#[test]
fn claim_json_accepts_aliases_and_defaults() {
    let claim = claim();
    assert_eq!(claim.claim.claim_number, "CLM1");
    assert_eq!(claim.claim.place_of_service, "41");
    assert_eq!(claim.claim.authorization.as_deref(), Some("AUTH9"));
    assert_eq!(claim.claim.payment_status, Some(PaymentStatus::Denied));
    let ambulance = claim.claim.ambulance.as_ref().expect("ambulance block");
    assert_eq!(ambulance.patient_weight, Some(180.0));
    assert_eq!(claim.claim.trip_number(), Some(42));
    assert_eq!(claim.claim.through(), NaiveDate::from_ymd_opt(2026, 1, 1));
    assert_eq!(claim.services[0].units, 1.0);
    assert_eq!(claim.services[0].trip.trip_leg.as_deref(), Some("A"));
    assert_eq!(claim.services[0].trip.value_added_service, Some(true));
}

#[test]
fn line_values_fall_back_to_the_claim() {
    let claim = claim();
    let (first, second) = (&claim.services[0], &claim.services[1]);
    assert_eq!(claim.line_trip_number(first), Some(42));
    assert_eq!(claim.line_payment_status(first), Some(PaymentStatus::Denied));
    assert_eq!(claim.line_payment_status(second), Some(PaymentStatus::Paid));
    assert_eq!(claim.line_place_of_service(first), "41");
    assert_eq!(claim.line_place_of_service(second), "99");
    assert!(claim.total_matches_lines());
    assert!(second.is_mileage());
}

#[test]
fn totals_compare_within_a_cent() {
    let mut claim = claim();
    claim.claim.total_charge = 65.004;
    assert!(claim.total_matches_lines());
    claim.claim.total_charge = 65.5;
    assert!(!claim.total_matches_lines());
}

#[test]
fn frequency_resolution() {
    let mut header = ClaimHeader::default();
    assert_eq!(header.resolved_frequency(), FrequencyCode::Original);
    header.adjustment_type = Some(AdjustmentType::Void);
    assert_eq!(header.resolved_frequency(), FrequencyCode::Void);
    header.adjustment_type = Some(AdjustmentType::Replacement);
    assert_eq!(header.resolved_frequency(), FrequencyCode::Replacement);
    header.frequency_code = Some(FrequencyCode::Corrected);
    assert_eq!(header.resolved_frequency(), FrequencyCode::Corrected);

    assert!(FrequencyCode::Void.requires_original_reference());
    assert!(!FrequencyCode::Corrected.requires_original_reference());
    assert_eq!("7".parse::<FrequencyCode>().unwrap(), FrequencyCode::Replacement);
    assert!("2".parse::<FrequencyCode>().is_err());
}

#[test]
fn blank_original_reference_is_absent() {
    let header = ClaimHeader {
        original_claim_number: Some("   ".to_string()),
        ..ClaimHeader::default()
    };
    assert_eq!(header.original_reference(), None);
}

#[test]
fn trip_deserializes_with_flattened_metadata() {
    let trip: Trip = serde_json::from_str(
        r#"{
            "dos": "2026-01-02",
            "member": {"member_id": "M1", "name": {"last": "DOE", "first": "JANE"}},
            "service": {"hcpcs": "T2005", "charge": 50.0},
            "trip_number": 7,
            "trip_reason_code": "DH",
            "paid_date": "2026-02-01",
            "icd10": ["R69"]
        }"#,
    )
    .expect("parse trip");
    assert_eq!(trip.member_id(), Some("M1"));
    assert_eq!(trip.metadata.trip_reason.as_deref(), Some("DH"));
    assert_eq!(trip.lifecycle.paid_date, NaiveDate::from_ymd_opt(2026, 2, 1));
    assert_eq!(trip.diagnoses, vec!["R69".to_string()]);
}

#[test]
fn mileage_codes() {
    assert!(is_mileage_code("A0425"));
    assert!(is_mileage_code("t2049"));
    assert!(!is_mileage_code("T2005"));
    assert!(!ServiceLine::new("A0130", 10.0).is_mileage());
}

#[test]
fn payer_profiles_resolve() {
    let payer = PayerProfile::by_key("uhc_ky").expect("known payer");
    assert_eq!(payer.payer_id, "87726");
    let custom = PayerProfile::custom("12345", "LOCAL PLAN");
    assert_eq!(custom.qualifier, "PI");
}
