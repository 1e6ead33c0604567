//! Grouped trips encode into interchanges the checker accepts.

use chrono::{NaiveDate, TimeZone, Utc};

use nemt_837p::{ClaimEncoder, EncoderConfig, FixedClock, LocationMode};
use nemt_batch::{BatchConfig, BatchGrouper, TimestampClaimNumbers};
use nemt_compliance::check;
use nemt_compliance::report::{
    CONSECUTIVE_MILEAGE, DROPOFF_BOTH_LEVELS, MILEAGE_FIRST, PICKUP_BOTH_LEVELS,
};
use nemt_model::{
    Address, AmbulanceBlock, BillingProvider, CommonDefaults, PersonName, ProviderRef, Receiver,
    SubmissionChannel, Submitter, Subscriber, Trip, TripService,
};
use nemt_x12::ControlNumbers;

fn address(line1: &str, zip: &str) -> Address {
    Address {
        line1: line1.to_string(),
        line2: None,
        city: "Louisville".to_string(),
        state: "KY".to_string(),
        zip: zip.to_string(),
    }
}

fn defaults() -> CommonDefaults {
    CommonDefaults {
        submitter: Some(Submitter {
            name: "ACME TRANSPORT".to_string(),
            id: "SUB01".to_string(),
            ..Submitter::default()
        }),
        billing_provider: Some(BillingProvider {
            npi: "1234567890".to_string(),
            name: "ACME TRANSPORT".to_string(),
            tax_id: Some("123456789".to_string()),
            taxonomy: None,
            address: address("1 Depot Rd", "40201"),
        }),
        payer: Some(Receiver {
            payer_name: "UNITED HEALTHCARE".to_string(),
            payer_id: "87726".to_string(),
        }),
        pos: None,
    }
}

fn trip(npi: &str, hcpcs: &str, charge: f64, units: f64, number: u64) -> Trip {
    Trip {
        dos: NaiveDate::from_ymd_opt(2026, 1, 1),
        member: Some(Subscriber {
            member_id: "M123456789".to_string(),
            name: PersonName {
                last: "DOE".to_string(),
                first: "JANE".to_string(),
            },
            ..Subscriber::default()
        }),
        rendering_provider: Some(ProviderRef::person(npi, "SMITH", "JOHN")),
        service: Some(TripService {
            hcpcs: Some(hcpcs.to_string()),
            modifiers: Vec::new(),
            charge,
            units: Some(units),
        }),
        trip_number: Some(number),
        pickup: Some(address("1 Main St", "40202")),
        dropoff: Some(address("500 Hospital Dr", "40205")),
        ambulance: Some(AmbulanceBlock {
            patient_weight: Some(175.0),
            transport_code: Some("A".to_string()),
            transport_reason: Some("DH".to_string()),
            ..AmbulanceBlock::default()
        }),
        ..Trip::default()
    }
}

fn six_legs() -> Vec<Trip> {
    vec![
        trip("9876543210", "T2005", 50.0, 1.0, 42),
        trip("9876543210", "T2049", 4.0, 4.0, 42),
        trip("9876543210", "T2005", 50.0, 1.0, 43),
        trip("9876543210", "T2049", 5.0, 5.0, 43),
        trip("9876543210", "T2005", 50.0, 1.0, 44),
        trip("9876543210", "T2049", 6.0, 6.0, 44),
    ]
}

fn encode_trips(trips: &[Trip], mode: LocationMode) -> String {
    let now = Utc.timestamp_opt(1_767_456_789, 0).unwrap();
    let mut grouper = BatchGrouper::new(
        BatchConfig::default(),
        TimestampClaimNumbers::new("CLM", now),
    );
    let outcome = grouper.group(trips, &defaults());
    assert!(outcome.report.is_success(), "{}", outcome.report);

    let timestamp = NaiveDate::from_ymd_opt(2026, 1, 2)
        .and_then(|d| d.and_hms_opt(8, 30, 0))
        .unwrap();
    ClaimEncoder::new(EncoderConfig::default().with_location_mode(mode))
        .unwrap()
        .with_clock(FixedClock(timestamp))
        .encode_batch(&outcome.claims, &mut ControlNumbers::new())
        .unwrap()
}

#[test]
fn six_legs_round_trip_without_errors_in_both_modes() {
    for mode in [LocationMode::Inline, LocationMode::SeparateLoops] {
        let edi = encode_trips(&six_legs(), mode);
        let report = check(&edi);
        assert_eq!(report.error_count(), 0, "{mode:?}: {report}");
        assert_eq!(report.transaction_count, 1);
        assert!(edi.contains("CLM*CLM4567890001*165.00***41:B:1*Y*A*Y*Y~"));
        assert_eq!(edi.matches("LX*").count(), 6);
        assert!(edi.contains("TRIPNUM-000000042"));
        assert!(edi.contains("TRIPNUM-000000044"));
    }
}

#[test]
fn three_rendering_providers_round_trip() {
    let mut trips = six_legs();
    for (idx, trip) in trips.iter_mut().enumerate() {
        let npi = ["1111111111", "2222222222", "3333333333"][idx / 2];
        trip.rendering_provider = Some(ProviderRef::person(npi, "SMITH", "JOHN"));
    }
    let edi = encode_trips(&trips, LocationMode::Inline);
    let report = check(&edi);
    assert!(report.is_compliant(), "{report}");
    assert_eq!(report.transaction_count, 3);
    assert!(edi.contains("NM1*82*1*SMITH*JOHN****XX*2222222222~"));
    assert!(edi.contains("CR1*LB*175*A*DH****000000043~"));
}

#[test]
fn mileage_first_fails_the_checker() {
    let trips = vec![
        trip("9876543210", "T2049", 4.0, 4.0, 42),
        trip("9876543210", "T2005", 50.0, 1.0, 42),
    ];
    let edi = encode_trips(&trips, LocationMode::Inline);
    let report = check(&edi);
    assert!(!report.is_compliant());
    assert!(report.has_code(MILEAGE_FIRST));
}

#[test]
fn claim_level_k3_across_transactions_stays_compliant() {
    let mut trips = six_legs();
    for (idx, trip) in trips.iter_mut().enumerate() {
        let npi = ["1111111111", "2222222222", "3333333333"][idx / 2];
        trip.rendering_provider = Some(ProviderRef::person(npi, "SMITH", "JOHN"));
        trip.submission_channel = Some(SubmissionChannel::Electronic);
    }
    for mode in [LocationMode::Inline, LocationMode::SeparateLoops] {
        let edi = encode_trips(&trips, mode);
        let report = check(&edi);
        assert_eq!(report.error_count(), 0, "{mode:?}: {report}");
        assert_eq!(report.transaction_count, 3);
        assert_eq!(edi.matches("K3*TRPN-ASPUFEELEC~").count(), 3);
    }
}

#[test]
fn mixed_single_and_grouped_claims_in_separate_mode() {
    let trips = vec![
        trip("1111111111", "T2005", 50.0, 1.0, 42),
        trip("2222222222", "T2005", 50.0, 1.0, 43),
        trip("2222222222", "T2049", 5.0, 5.0, 43),
    ];
    let edi = encode_trips(&trips, LocationMode::SeparateLoops);
    let report = check(&edi);
    assert_eq!(report.error_count(), 0, "{report}");
    assert_eq!(report.transaction_count, 2);
    assert!(!report.has_code(PICKUP_BOTH_LEVELS), "{report}");
    assert!(!report.has_code(DROPOFF_BOTH_LEVELS), "{report}");
    assert_eq!(edi.matches("NM1*PW*2").count(), 3);
}

#[test]
fn later_claim_starting_with_mileage_is_caught() {
    let trips = vec![
        trip("1111111111", "T2005", 50.0, 1.0, 42),
        trip("1111111111", "T2049", 4.0, 4.0, 42),
        trip("2222222222", "T2049", 5.0, 5.0, 43),
        trip("2222222222", "T2005", 50.0, 1.0, 43),
    ];
    let edi = encode_trips(&trips, LocationMode::Inline);
    let report = check(&edi);
    let errors = report.errors();
    assert_eq!(errors.len(), 1, "{report}");
    assert_eq!(errors[0].code, MILEAGE_FIRST);
    assert!(!report.has_code(CONSECUTIVE_MILEAGE));
}

#[test]
fn grouped_claim_carries_referring_and_supervising_loops() {
    let mut trips = six_legs();
    trips[0].referring_provider = Some(ProviderRef::person("5555555555", "REFER", "RITA"));
    trips[0].supervising_provider = Some(ProviderRef::person("4444444444", "DRIVER", "DAN"));
    let edi = encode_trips(&trips, LocationMode::Inline);
    assert!(check(&edi).is_compliant());
    assert!(edi.contains("NM1*DN*1*REFER*RITA****XX*5555555555~"));
    assert_eq!(edi.matches("NM1*DQ*1*DRIVER*DAN****XX*4444444444~").count(), 1);
}
