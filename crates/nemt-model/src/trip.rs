//! Raw per-leg trip records, the input to batch grouping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::claim::{Adjudication, AmbulanceBlock, PaymentLifecycle, TripMetadata};
use crate::codes::{FrequencyCode, NetworkIndicator, PaymentStatus, SubmissionChannel};
use crate::party::{
    Address, BillingProvider, MemberGroup, ProviderRef, Receiver, Submitter, Subscriber,
};

/// The single billed service on a trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripService {
    #[serde(default)]
    pub hcpcs: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub charge: f64,
    #[serde(default)]
    pub units: Option<f64>,
}

/// One leg of transportation as exported by a broker.
///
/// Required for grouping: `dos`, `member`, and `service.hcpcs`. Everything
/// else is optional; claim-level values are taken from the first trip of each
/// group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trip {
    pub dos: Option<NaiveDate>,
    pub member: Option<Subscriber>,
    pub rendering_provider: Option<ProviderRef>,
    pub referring_provider: Option<ProviderRef>,
    pub billing_provider: Option<BillingProvider>,
    pub payer: Option<Receiver>,
    pub service: Option<TripService>,
    pub claim_number: Option<String>,
    pub frequency_code: Option<FrequencyCode>,
    pub original_claim_number: Option<String>,
    pub pos: Option<String>,
    pub trip_number: Option<u64>,
    pub pickup: Option<Address>,
    pub dropoff: Option<Address>,
    pub pickup_location_code: Option<String>,
    pub pickup_time: Option<String>,
    pub dropoff_location_code: Option<String>,
    pub dropoff_time: Option<String>,
    #[serde(flatten)]
    pub metadata: TripMetadata,
    pub payment_status: Option<PaymentStatus>,
    pub submission_channel: Option<SubmissionChannel>,
    pub emergency: Option<bool>,
    pub supervising_provider: Option<ProviderRef>,
    pub ambulance: Option<AmbulanceBlock>,
    #[serde(alias = "icd10")]
    pub diagnoses: Vec<String>,
    #[serde(alias = "auth_number")]
    pub authorization: Option<String>,
    pub patient_account: Option<String>,
    #[serde(alias = "rendering_network_indicator")]
    pub network_indicator: Option<NetworkIndicator>,
    pub member_group: Option<MemberGroup>,
    pub subscriber_internal_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub lifecycle: PaymentLifecycle,
    pub adjudication: Vec<Adjudication>,
}

impl Trip {
    /// Member id, if the member is present.
    #[must_use]
    pub fn member_id(&self) -> Option<&str> {
        self.member.as_ref().map(|m| m.member_id.as_str())
    }

    /// HCPCS of the trip service, if present and non-blank.
    #[must_use]
    pub fn hcpcs(&self) -> Option<&str> {
        self.service
            .as_ref()
            .and_then(|s| s.hcpcs.as_deref())
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }
}

/// Values applied to every claim of a batch when a trip omits its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonDefaults {
    pub submitter: Option<Submitter>,
    pub billing_provider: Option<BillingProvider>,
    pub payer: Option<Receiver>,
    pub pos: Option<String>,
}
