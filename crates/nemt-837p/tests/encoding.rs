//! End-to-end encoding scenarios.

use chrono::{NaiveDate, NaiveDateTime};

use nemt_837p::{
    ClaimEncoder, ClaimValidator, DenialDefaults, EncodeError, EncoderConfig, FieldIssue,
    FixedClock, LocationMode, ValidationError,
};
use nemt_model::{Claim, FrequencyCode, PaymentStatus, PayerProfile};
use nemt_x12::{ControlNumbers, Delimiters, UsageIndicator, X12Error};

const CLAIM_JSON: &str = r#"{
    "submitter": {"name": "ACME TRANSPORT", "id": "SUB01", "contact_name": "BILLING", "contact_phone": "5025551234"},
    "receiver": {"payer_name": "UNITED HEALTHCARE", "payer_id": "87726"},
    "billing_provider": {
        "npi": "1234567890",
        "name": "ACME TRANSPORT",
        "tax_id": "123456789",
        "address": {"line1": "1 Main St", "city": "Louisville", "state": "KY", "zip": "40202"}
    },
    "subscriber": {
        "member_id": "M123456789",
        "name": {"last": "DOE", "first": "JANE"},
        "dob": "1950-03-04",
        "sex": "F"
    },
    "claim": {
        "clm_number": "CLM100",
        "total_charge": 65.0,
        "from": "2026-01-01",
        "icd10": ["Z99.3"],
        "ambulance": {
            "weight_unit": "LB",
            "patient_weight": 175,
            "transport_code": "A",
            "transport_reason": "DH",
            "trip_number": 42,
            "pickup": {"line1": "1 Main St", "city": "Louisville", "state": "KY", "zip": "40202"},
            "dropoff": {"line1": "500 Hospital Dr", "city": "Louisville", "state": "KY", "zip": "40205"}
        }
    },
    "services": [
        {"hcpcs": "A0130", "charge": 50.0},
        {"hcpcs": "T2049", "charge": 15.0, "units": 6}
    ]
}"#;

fn claim() -> Claim {
    serde_json::from_str(CLAIM_JSON).expect("fixture claim")
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 2)
        .and_then(|d| d.and_hms_opt(13, 45, 0))
        .expect("valid timestamp")
}

fn encoder(config: EncoderConfig) -> ClaimEncoder {
    ClaimEncoder::new(config)
        .expect("valid config")
        .with_clock(FixedClock(now()))
}

fn encode(config: EncoderConfig, claim: &Claim) -> String {
    encoder(config)
        .encode(claim, &mut ControlNumbers::new())
        .expect("claim encodes")
}

fn segments(edi: &str) -> Vec<&str> {
    edi.split('~').filter(|s| !s.is_empty()).collect()
}

/// Segments strictly between the CLM and the first LX.
fn claim_level(edi: &str) -> Vec<&str> {
    segments(edi)
        .into_iter()
        .skip_while(|s| !s.starts_with("CLM*"))
        .take_while(|s| !s.starts_with("LX*"))
        .collect()
}

#[test]
fn envelope_and_hierarchy() {
    let edi = encode(EncoderConfig::default().with_sender("ZZ", "SENDER01"), &claim());
    let segs = segments(&edi);
    assert_eq!(segs[0].len(), 105);
    assert!(segs[0].starts_with("ISA*00*          *00*          *ZZ*SENDER01       *ZZ*87726          *260102*1345*^*00501*000000001*0*T*:"));
    assert_eq!(segs[1], "GS*HC*SENDER01*87726*20260102*1345*1*X*005010X222A1");
    assert_eq!(segs[2], "ST*837*0001*005010X222A1");
    assert_eq!(segs[3], "BHT*0019*00*CLM100*20260102*1345*CH");
    assert_eq!(segs[4], "NM1*41*2*ACME TRANSPORT*****46*SUB01");
    assert_eq!(segs[5], "PER*IC*BILLING*TE*5025551234");
    assert_eq!(segs[6], "NM1*40*2*UNITED HEALTHCARE*****46*87726");
    assert_eq!(segs[7], "HL*1**20*1");
    assert_eq!(segs[8], "NM1*85*2*ACME TRANSPORT*****XX*1234567890");
    assert_eq!(segs[11], "REF*EI*123456789");
    assert_eq!(segs[12], "HL*2*1*22*0");
    assert_eq!(segs[13], "SBR*P*18*******MC");
    assert_eq!(segs[14], "NM1*IL*1*DOE*JANE****MI*M123456789");
    assert_eq!(segs[15], "DMG*D8*19500304*F");
    assert_eq!(segs[16], "NM1*PR*2*UNITED HEALTHCARE*****PI*87726");
    assert_eq!(segs[17], "CLM*CLM100*65.00***41:B:1*Y*A*Y*Y");
    assert_eq!(segs[18], "DTP*434*D8*20260101");
    assert_eq!(segs[19], "HI*ABK:Z993");
    assert_eq!(segs.last().copied(), Some("IEA*1*000000001"));
}

#[test]
fn se_counts_st_through_se() {
    let edi = encode(EncoderConfig::default(), &claim());
    let segs = segments(&edi);
    let st = segs.iter().position(|s| s.starts_with("ST*")).unwrap();
    let se = segs.iter().position(|s| s.starts_with("SE*")).unwrap();
    assert_eq!(segs[se], format!("SE*{}*0001", se - st + 1));
    assert!(segs.contains(&"GE*1*1"));
}

#[test]
fn service_lines() {
    let edi = encode(EncoderConfig::default(), &claim());
    let segs = segments(&edi);
    assert!(segs.contains(&"LX*1"));
    assert!(segs.contains(&"SV1*HC:A0130*50.00*UN*1*41**1"));
    assert!(segs.contains(&"LX*2"));
    assert!(segs.contains(&"SV1*HC:T2049*15.00*UN*6*41**1"));
    assert_eq!(segs.iter().filter(|s| **s == "DTP*472*D8*20260101").count(), 2);
}

#[test]
fn trip_reference_is_zero_padded_in_inline_mode() {
    let edi = encode(EncoderConfig::default(), &claim());
    assert!(edi.contains(
        "CR1*LB*175*A*DH****000000042*1 Main St, Louisville, KY, 40202*500 Hospital Dr, Louisville, KY, 40205~"
    ));
    assert!(edi.contains("NTE*ADD*TRIPNUM-000000042~"));
    assert_eq!(edi.matches("TRIPNUM-000000042").count(), 3);
    let claim_segments = claim_level(&edi);
    assert!(!claim_segments.iter().any(|s| s.starts_with("NM1*PW")));
    assert!(!claim_segments.iter().any(|s| s.starts_with("NM1*45")));
}

#[test]
fn trip_reference_is_zero_padded_in_separate_mode() {
    let config = EncoderConfig::default().with_location_mode(LocationMode::SeparateLoops);
    let edi = encode(config, &claim());
    assert!(edi.contains("CR1*LB*175*A*DH****000000042~"));
    assert!(edi.contains("NTE*ADD*TRIPNUM-000000042~"));
    let claim_segments = claim_level(&edi);
    let pickup = claim_segments.iter().position(|s| *s == "NM1*PW*2").unwrap();
    assert_eq!(claim_segments[pickup + 1], "N3*1 Main St");
    assert_eq!(claim_segments[pickup + 2], "N4*Louisville*KY*40202");
    let dropoff = claim_segments.iter().position(|s| *s == "NM1*45*2").unwrap();
    assert_eq!(claim_segments[dropoff + 1], "N3*500 Hospital Dr");
}

#[test]
fn replacement_requires_original_reference() {
    let mut claim = claim();
    claim.claim.frequency_code = Some(FrequencyCode::Replacement);
    let err = encoder(EncoderConfig::default())
        .encode(&claim, &mut ControlNumbers::new())
        .unwrap_err();
    match err {
        EncodeError::Validation(validation) => assert!(validation.has_code("VAL_039")),
        other => panic!("expected a validation error, got {other}"),
    }

    claim.claim.original_claim_number = Some("ORIG123".to_string());
    let edi = encode(EncoderConfig::default(), &claim);
    assert!(edi.contains("CLM*CLM100*65.00***41:B:7*Y*A*Y*Y~"));
    assert!(edi.contains("REF*F8*ORIG123~"));
}

#[test]
fn failed_validation_consumes_no_control_numbers() {
    let mut bad = claim();
    bad.services.clear();
    let encoder = encoder(EncoderConfig::default());
    let mut control = ControlNumbers::new();
    assert!(encoder.encode(&bad, &mut control).is_err());
    let edi = encoder.encode(&claim(), &mut control).unwrap();
    assert!(edi.contains("*000000001*0*T*:~"));
}

#[test]
fn denied_claim_gets_default_adjustments() {
    let mut claim = claim();
    claim.claim.payment_status = Some(PaymentStatus::Denied);
    let edi = encode(EncoderConfig::default(), &claim);
    let claim_segments = claim_level(&edi);
    assert!(claim_segments.contains(&"CAS*CO*45*65.00"));
    assert!(claim_segments.contains(&"MOA***N381"));
    assert!(claim_segments.contains(&"K3*PYMS-D"));
    assert!(edi.contains("CAS*CO*45*50.00~"));
    assert!(edi.contains("CAS*CO*45*15.00~"));
    assert_eq!(edi.matches("LQ*HE*N381~").count(), 2);
}

#[test]
fn denial_defaults_can_be_disabled() {
    let mut claim = claim();
    claim.claim.payment_status = Some(PaymentStatus::Denied);
    let config = EncoderConfig::default().with_denial_defaults(DenialDefaults {
        enabled: false,
        ..DenialDefaults::default()
    });
    let edi = encode(config, &claim);
    assert!(!edi.contains("CAS*"));
    assert!(!edi.contains("MOA*"));
    assert!(!edi.contains("LQ*"));
}

#[test]
fn paid_claim_has_no_denial_segments() {
    let mut claim = claim();
    claim.claim.payment_status = Some(PaymentStatus::Paid);
    let edi = encode(EncoderConfig::default(), &claim);
    assert!(edi.contains("K3*PYMS-P~"));
    assert!(!edi.contains("CAS*"));
}

#[test]
fn rendering_falls_back_to_billing_provider() {
    let edi = encode(EncoderConfig::default(), &claim());
    assert!(claim_level(&edi).contains(&"NM1*82*2*ACME TRANSPORT*****XX*1234567890"));
}

#[test]
fn payer_profile_overrides_receiver() {
    let payer = PayerProfile::by_key("AVAILITY").unwrap();
    let edi = encode(EncoderConfig::default().with_payer(payer), &claim());
    assert!(edi.contains("NM1*40*2*AVAILITY*****46*030240928~"));
    assert!(edi.contains("NM1*PR*2*AVAILITY*****46*030240928~"));
    assert!(edi.contains("*ZZ*030240928      *"));
}

#[test]
fn production_usage_and_custom_delimiters() {
    let delimiters = Delimiters::new('|', '!', '>', '^').unwrap();
    let config = EncoderConfig::default()
        .with_usage(UsageIndicator::Production)
        .with_delimiters(delimiters);
    let edi = encode(config, &claim());
    assert!(edi.starts_with("ISA|"));
    assert!(edi.contains("|P|>!"));
    assert!(edi.contains("CLM|CLM100|65.00|||41>B>1|Y|A|Y|Y!"));
    assert!(edi.ends_with("IEA|1|000000001!"));
}

#[test]
fn oversized_isa_identifier_is_rejected() {
    let config = EncoderConfig::default().with_sender("ZZ", "A-SENDER-ID-THAT-IS-TOO-LONG");
    assert!(matches!(
        ClaimEncoder::new(config),
        Err(EncodeError::Envelope(_))
    ));
}

#[test]
fn configured_isa_identifier_with_separator_is_rejected() {
    let config = EncoderConfig::default().with_receiver("ZZ", "877~26");
    assert!(matches!(
        ClaimEncoder::new(config),
        Err(EncodeError::Envelope(X12Error::ReservedCharacter {
            field: "ISA08",
            ..
        }))
    ));
}

#[test]
fn submitter_id_fallback_is_checked_before_control_numbers() {
    let encoder = encoder(EncoderConfig::default());
    let mut control = ControlNumbers::new();

    let mut bad = claim();
    bad.submitter.id = "SUB*01".to_string();
    assert!(matches!(
        encoder.encode(&bad, &mut control),
        Err(EncodeError::Envelope(X12Error::ReservedCharacter {
            field: "ISA06",
            character: '*',
            ..
        }))
    ));
    bad.submitter.id = "SUBMITTER-ID-TOO-LONG".to_string();
    assert!(matches!(
        encoder.encode(&bad, &mut control),
        Err(EncodeError::Envelope(X12Error::FieldTooWide { field: "ISA06", .. }))
    ));
    assert_eq!(control.peek_interchange(), 1);
    assert_eq!(control.peek_group(), 1);
    assert_eq!(control.peek_transaction(), 1);

    let edi = encoder.encode(&claim(), &mut control).expect("claim encodes");
    assert!(edi.contains("*ZZ*SUB01          *"));
    assert!(edi.contains("*000000001*0*T*:~"));
}

#[test]
fn batch_shares_one_envelope() {
    let first = claim();
    let mut second = claim();
    second.claim.claim_number = "CLM101".to_string();
    let mut control = ControlNumbers::starting_at(7, 3, 9);
    let edi = encoder(EncoderConfig::default())
        .encode_batch(&[first, second], &mut control)
        .unwrap();
    let segs = segments(&edi);
    assert_eq!(segs.iter().filter(|s| s.starts_with("ISA*")).count(), 1);
    assert!(segs.contains(&"ST*837*0009*005010X222A1"));
    assert!(segs.contains(&"ST*837*0010*005010X222A1"));
    assert!(segs.contains(&"GE*2*3"));
    assert!(segs.contains(&"IEA*1*000000007"));
    assert_eq!(control.peek_transaction(), 11);
}

struct RejectEverything;

impl ClaimValidator for RejectEverything {
    fn validate(&self, claim: &Claim) -> Result<Vec<FieldIssue>, ValidationError> {
        Err(ValidationError::new(
            &claim.claim.claim_number,
            vec![FieldIssue::error("CUSTOM_1", "claim", "payer portal closed")],
        ))
    }
}

#[test]
fn custom_validator_error_is_surfaced_verbatim() {
    let err = encoder(EncoderConfig::default())
        .with_validator(RejectEverything)
        .encode(&claim(), &mut ControlNumbers::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "claim CLM100 failed validation: payer portal closed (CUSTOM_1)"
    );
}
