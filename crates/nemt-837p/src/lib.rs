//! X12 837P (005010X222A1) encoder for NEMT claims.
//!
//! [`ClaimEncoder`] validates each claim, then writes one ISA/GS envelope with
//! one ST/SE transaction set per claim. Ambulance pickup and dropoff
//! addresses go either inline into CR1 or into their own name/address loops,
//! selected by [`LocationMode`].
//!
//! ```
//! use chrono::NaiveDate;
//! use nemt_837p::{ClaimEncoder, EncoderConfig, FixedClock};
//! use nemt_model::Claim;
//! use nemt_x12::ControlNumbers;
//!
//! let claim: Claim = serde_json::from_str(r#"{
//!     "submitter": {"name": "ACME", "id": "SUB01"},
//!     "receiver": {"payer_name": "UHC", "payer_id": "87726"},
//!     "billing_provider": {"npi": "1234567890", "name": "ACME",
//!         "address": {"line1": "1 Main St", "city": "Louisville", "state": "KY", "zip": "40202"}},
//!     "subscriber": {"member_id": "M1", "name": {"last": "DOE", "first": "JANE"}},
//!     "claim": {"clm_number": "CLM1", "total_charge": 50.0, "from": "2026-01-01"},
//!     "services": [{"hcpcs": "A0130", "charge": 50.0}]
//! }"#).unwrap();
//!
//! let now = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap().and_hms_opt(13, 45, 0).unwrap();
//! let encoder = ClaimEncoder::new(EncoderConfig::default())
//!     .unwrap()
//!     .with_clock(FixedClock(now));
//! let edi = encoder.encode(&claim, &mut ControlNumbers::new()).unwrap();
//! assert!(edi.starts_with("ISA*"));
//! assert!(edi.contains("CLM*CLM1*50.00***41:B:1*Y*A*Y*Y~"));
//! ```

pub mod clock;
pub mod config;
pub mod encoder;
pub mod error;
mod loops;
pub mod segments;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{DenialDefaults, EncoderConfig, IMPLEMENTATION_VERSION, LocationMode};
pub use encoder::{ClaimEncoder, encode};
pub use error::{EncodeError, FieldIssue, Result, ValidationError};
pub use validate::{ClaimValidator, FieldValidator, encoder_prerequisites};
