//! Claim-number generation.

use chrono::{DateTime, Utc};

/// Source of claim numbers for claims that do not carry one.
///
/// Numbers must be unique within one batch call.
pub trait ClaimNumberSource {
    fn next_claim_number(&mut self) -> String;
}

/// Prefix, a stamp taken once per batch, and a four-digit sequence:
/// `CLM` + `456789` + `0001`.
#[derive(Debug, Clone)]
pub struct TimestampClaimNumbers {
    prefix: String,
    stamp: String,
    sequence: u32,
}

impl TimestampClaimNumbers {
    /// Capture the stamp from `now` (last six digits of the Unix seconds).
    #[must_use]
    pub fn new(prefix: impl Into<String>, now: DateTime<Utc>) -> Self {
        let seconds = now.timestamp().unsigned_abs() % 1_000_000;
        Self {
            prefix: prefix.into(),
            stamp: format!("{seconds:06}"),
            sequence: 0,
        }
    }

    /// Stamp taken from the system clock.
    #[must_use]
    pub fn from_system_clock(prefix: impl Into<String>) -> Self {
        Self::new(prefix, Utc::now())
    }
}

impl ClaimNumberSource for TimestampClaimNumbers {
    fn next_claim_number(&mut self) -> String {
        self.sequence += 1;
        format!("{}{}{:04}", self.prefix, self.stamp, self.sequence)
    }
}

impl<F> ClaimNumberSource for F
where
    F: FnMut() -> String,
{
    fn next_claim_number(&mut self) -> String {
        self()
    }
}
