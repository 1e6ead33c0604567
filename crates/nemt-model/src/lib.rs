//! Data model for NEMT trips and 837P professional claims.
//!
//! Trips are raw broker exports, one per leg. Claims are the complete
//! documents the encoder turns into X12; they deserialize from the JSON shape
//! with `submitter`, `receiver`, `billing_provider`, `subscriber`, `claim` and
//! `services` keys.

pub mod claim;
pub mod codes;
pub mod error;
pub mod party;
pub mod payer;
pub mod severity;
pub mod trip;

pub use claim::{
    Adjudication, AmbulanceBlock, CHARGE_TOLERANCE, CasAdjustment, Claim, ClaimHeader,
    PaymentLifecycle, ServiceLine, TripMetadata,
};
pub use codes::{
    AdjustmentType, FrequencyCode, Gender, MILEAGE_CODES, NetworkIndicator, PaymentStatus,
    SubmissionChannel, WeightUnit, is_mileage_code,
};
pub use error::{ModelError, Result};
pub use party::{
    Address, BillingProvider, MemberGroup, PersonName, ProviderRef, Receiver, Submitter,
    Subscriber,
};
pub use payer::{PAYER_PROFILES, PayerProfile};
pub use severity::Severity;
pub use trip::{CommonDefaults, Trip, TripService};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_by_weight() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert_eq!(Severity::Warning.to_string(), "WARNING");
    }

    #[test]
    fn claim_serializes() {
        let claim = Claim {
            claim: ClaimHeader {
                claim_number: "CLM1".to_string(),
                total_charge: 50.0,
                ..ClaimHeader::default()
            },
            services: vec![ServiceLine::new("A0130", 50.0)],
            ..Claim::default()
        };
        let json = serde_json::to_string(&claim).expect("serialize claim");
        let round: Claim = serde_json::from_str(&json).expect("deserialize claim");
        assert_eq!(round.claim.claim_number, "CLM1");
        assert_eq!(round.services.len(), 1);
    }
}
