//! Claim document: header, ambulance block, service lines and adjudication.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codes::{
    AdjustmentType, FrequencyCode, NetworkIndicator, PaymentStatus, SubmissionChannel, WeightUnit,
};
use crate::party::{
    Address, BillingProvider, MemberGroup, ProviderRef, Receiver, Submitter, Subscriber,
};

/// Tolerance used when comparing claim totals with line sums.
pub const CHARGE_TOLERANCE: f64 = 0.01;

/// One complete claim document, the unit submitted to a payer.
///
/// Claims are built once (by the batch grouper or from JSON) and then only
/// read; the encoder never mutates them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(default)]
    pub submitter: Submitter,
    #[serde(default)]
    pub receiver: Receiver,
    pub billing_provider: BillingProvider,
    pub subscriber: Subscriber,
    pub claim: ClaimHeader,
    #[serde(default)]
    pub services: Vec<ServiceLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendering_provider: Option<ProviderRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referring_provider: Option<ProviderRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_facility: Option<ProviderRef>,
}

impl Claim {
    /// Sum of the service line charges.
    #[must_use]
    pub fn service_total(&self) -> f64 {
        self.services.iter().map(|s| s.charge).sum()
    }

    /// Whether the header total matches the line sum within a cent.
    #[must_use]
    pub fn total_matches_lines(&self) -> bool {
        (self.claim.total_charge - self.service_total()).abs() <= CHARGE_TOLERANCE
    }

    /// Trip reference for a line: its own, else the claim's.
    #[must_use]
    pub fn line_trip_number(&self, line: &ServiceLine) -> Option<u64> {
        line.trip_number.or_else(|| self.claim.trip_number())
    }

    /// Payment status for a line: its own, else the claim's.
    #[must_use]
    pub fn line_payment_status(&self, line: &ServiceLine) -> Option<PaymentStatus> {
        line.payment_status.or(self.claim.payment_status)
    }

    /// Place of service for a line: its own, else the claim's.
    #[must_use]
    pub fn line_place_of_service<'a>(&'a self, line: &'a ServiceLine) -> &'a str {
        line.place_of_service
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.claim.place_of_service)
    }
}

/// Loop 2300 claim-level information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimHeader {
    #[serde(rename = "clm_number", alias = "claim_number")]
    pub claim_number: String,
    pub total_charge: f64,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(rename = "pos", default = "default_place_of_service")]
    pub place_of_service: String,
    #[serde(default)]
    pub frequency_code: Option<FrequencyCode>,
    #[serde(default)]
    pub adjustment_type: Option<AdjustmentType>,
    #[serde(default)]
    pub original_claim_number: Option<String>,
    #[serde(rename = "icd10", default)]
    pub diagnoses: Vec<String>,
    #[serde(default, alias = "auth_number")]
    pub authorization: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub patient_account: Option<String>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub submission_channel: Option<SubmissionChannel>,
    #[serde(default, alias = "rendering_network_indicator")]
    pub network_indicator: Option<NetworkIndicator>,
    #[serde(default)]
    pub subscriber_internal_id: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub lifecycle: PaymentLifecycle,
    #[serde(default)]
    pub adjustments: Vec<CasAdjustment>,
    #[serde(default)]
    pub remark_codes: Vec<String>,
    #[serde(default)]
    pub member_group: Option<MemberGroup>,
    #[serde(default)]
    pub ambulance: Option<AmbulanceBlock>,
    #[serde(default)]
    pub supervising_provider: Option<ProviderRef>,
}

fn default_place_of_service() -> String {
    crate::codes::DEFAULT_PLACE_OF_SERVICE.to_string()
}

impl Default for ClaimHeader {
    fn default() -> Self {
        Self {
            claim_number: String::new(),
            total_charge: 0.0,
            from: None,
            to: None,
            place_of_service: default_place_of_service(),
            frequency_code: None,
            adjustment_type: None,
            original_claim_number: None,
            diagnoses: Vec::new(),
            authorization: None,
            tracking_number: None,
            patient_account: None,
            payment_status: None,
            submission_channel: None,
            network_indicator: None,
            subscriber_internal_id: None,
            ip_address: None,
            user_id: None,
            lifecycle: PaymentLifecycle::default(),
            adjustments: Vec::new(),
            remark_codes: Vec::new(),
            member_group: None,
            ambulance: None,
            supervising_provider: None,
        }
    }
}

impl ClaimHeader {
    /// Effective frequency code.
    ///
    /// An explicit code wins; otherwise a void or replacement adjustment type
    /// maps to `8` or `7`; otherwise the claim is an original (`1`).
    #[must_use]
    pub fn resolved_frequency(&self) -> FrequencyCode {
        if let Some(code) = self.frequency_code {
            return code;
        }
        match self.adjustment_type {
            Some(AdjustmentType::Void) => FrequencyCode::Void,
            Some(AdjustmentType::Replacement) => FrequencyCode::Replacement,
            None => FrequencyCode::Original,
        }
    }

    /// Original claim number, when present and non-blank.
    #[must_use]
    pub fn original_reference(&self) -> Option<&str> {
        self.original_claim_number
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// End of the service period, defaulting to its start.
    #[must_use]
    pub fn through(&self) -> Option<NaiveDate> {
        self.to.or(self.from)
    }

    /// Claim-level trip reference (from the ambulance block).
    #[must_use]
    pub fn trip_number(&self) -> Option<u64> {
        self.ambulance.as_ref().and_then(|a| a.trip_number)
    }
}

/// Payment lifecycle dates and amounts reported by the broker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentLifecycle {
    pub received_date: Option<NaiveDate>,
    pub adjudication_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    pub allowed_amount: Option<f64>,
    pub not_covered_amount: Option<f64>,
    pub patient_paid_amount: Option<f64>,
}

impl PaymentLifecycle {
    #[must_use]
    pub fn has_dates(&self) -> bool {
        self.received_date.is_some() || self.adjudication_date.is_some() || self.paid_date.is_some()
    }
}

/// Ambulance transport information for the claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbulanceBlock {
    pub weight_unit: WeightUnit,
    #[serde(alias = "patient_weight_lbs")]
    pub patient_weight: Option<f64>,
    pub transport_code: Option<String>,
    pub transport_reason: Option<String>,
    pub trip_number: Option<u64>,
    pub special_needs: Option<bool>,
    pub attendant_type: Option<String>,
    #[serde(alias = "accompany_count")]
    pub accompanying_count: Option<u32>,
    pub pickup_indicator: Option<String>,
    pub requested_date: Option<NaiveDate>,
    pub pickup: Option<Address>,
    pub dropoff: Option<Address>,
}

/// Claim or line adjustment (CAS).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasAdjustment {
    #[serde(alias = "group")]
    pub group_code: String,
    #[serde(alias = "reason")]
    pub reason_code: String,
    pub amount: f64,
    #[serde(default)]
    pub quantity: Option<f64>,
}

/// Line adjudication by a payer (loop 2430).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjudication {
    #[serde(default)]
    pub payer_id: Option<String>,
    pub paid_amount: f64,
    #[serde(default)]
    pub paid_units: Option<f64>,
    #[serde(default, alias = "cas")]
    pub adjustments: Vec<CasAdjustment>,
}

/// Loop 2400 service line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLine {
    pub hcpcs: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub charge: f64,
    #[serde(default = "default_units")]
    pub units: f64,
    #[serde(rename = "pos", default)]
    pub place_of_service: Option<String>,
    #[serde(default)]
    pub dos: Option<NaiveDate>,
    #[serde(default)]
    pub emergency: Option<bool>,
    #[serde(default, alias = "pickup_loc_code")]
    pub pickup_location_code: Option<String>,
    #[serde(default)]
    pub pickup_time: Option<String>,
    #[serde(default, alias = "drop_loc_code")]
    pub dropoff_location_code: Option<String>,
    #[serde(default, alias = "drop_time")]
    pub dropoff_time: Option<String>,
    #[serde(flatten)]
    pub trip: TripMetadata,
    #[serde(default)]
    pub trip_number: Option<u64>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub adjustments: Vec<CasAdjustment>,
    #[serde(default)]
    pub remark_codes: Vec<String>,
    #[serde(default)]
    pub supervising_provider: Option<ProviderRef>,
    #[serde(default)]
    pub pickup: Option<Address>,
    #[serde(default)]
    pub dropoff: Option<Address>,
    #[serde(default)]
    pub adjudication: Vec<Adjudication>,
}

fn default_units() -> f64 {
    1.0
}

impl ServiceLine {
    /// A line with the given code and charge and nothing else.
    #[must_use]
    pub fn new(hcpcs: impl Into<String>, charge: f64) -> Self {
        Self {
            hcpcs: hcpcs.into(),
            modifiers: Vec::new(),
            charge,
            units: default_units(),
            place_of_service: None,
            dos: None,
            emergency: None,
            pickup_location_code: None,
            pickup_time: None,
            dropoff_location_code: None,
            dropoff_time: None,
            trip: TripMetadata::default(),
            trip_number: None,
            payment_status: None,
            adjustments: Vec::new(),
            remark_codes: Vec::new(),
            supervising_provider: None,
            pickup: None,
            dropoff: None,
            adjudication: Vec::new(),
        }
    }

    /// Set the billed units.
    #[must_use]
    pub fn with_units(mut self, units: f64) -> Self {
        self.units = units;
        self
    }

    /// Whether this line bills mileage.
    #[must_use]
    pub fn is_mileage(&self) -> bool {
        crate::codes::is_mileage_code(&self.hcpcs)
    }
}

/// Per-leg trip attributes carried as key-value text on the service line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripMetadata {
    pub trip_type: Option<String>,
    pub trip_leg: Option<String>,
    #[serde(alias = "vas_indicator")]
    pub value_added_service: Option<bool>,
    pub transport_type: Option<String>,
    pub appointment_time: Option<String>,
    pub scheduled_pickup_time: Option<String>,
    #[serde(alias = "trip_reason_code")]
    pub trip_reason: Option<String>,
    #[serde(alias = "arrive_time")]
    pub arrival_time: Option<String>,
    #[serde(alias = "depart_time")]
    pub departure_time: Option<String>,
}

impl TripMetadata {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> ClaimHeader {
        ClaimHeader {
            claim_number: "CLM1".to_string(),
            total_charge: 100.0,
            ..ClaimHeader::default()
        }
    }

    #[test]
    fn frequency_resolution_prefers_explicit_code() {
        let mut h = header();
        assert_eq!(h.resolved_frequency(), FrequencyCode::Original);
        h.adjustment_type = Some(AdjustmentType::Void);
        assert_eq!(h.resolved_frequency(), FrequencyCode::Void);
        h.frequency_code = Some(FrequencyCode::Corrected);
        assert_eq!(h.resolved_frequency(), FrequencyCode::Corrected);
    }

    #[test]
    fn line_inherits_claim_trip_and_status() {
        let mut claim = Claim {
            claim: header(),
            ..Claim::default()
        };
        claim.claim.ambulance = Some(AmbulanceBlock {
            trip_number: Some(42),
            ..AmbulanceBlock::default()
        });
        claim.claim.payment_status = Some(PaymentStatus::Denied);
        let mut line = ServiceLine::new("T2005", 50.0);
        assert_eq!(claim.line_trip_number(&line), Some(42));
        assert_eq!(claim.line_payment_status(&line), Some(PaymentStatus::Denied));
        line.trip_number = Some(7);
        line.payment_status = Some(PaymentStatus::Paid);
        assert_eq!(claim.line_trip_number(&line), Some(7));
        assert_eq!(claim.line_payment_status(&line), Some(PaymentStatus::Paid));
    }

    #[test]
    fn totals_compare_within_a_cent() {
        let mut claim = Claim {
            claim: header(),
            ..Claim::default()
        };
        claim.services = vec![ServiceLine::new("T2005", 60.0), ServiceLine::new("T2049", 39.995)];
        assert!(claim.total_matches_lines());
        claim.claim.total_charge = 101.0;
        assert!(!claim.total_matches_lines());
    }
}
