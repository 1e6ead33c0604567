//! Batch grouping options.

use nemt_model::FrequencyCode;
use serde::{Deserialize, Serialize};

/// Options controlling how trips become claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Prefix for generated claim numbers.
    pub claim_number_prefix: String,
    /// Report claims sharing (claim number, frequency, original reference).
    pub validate_duplicates: bool,
    /// Report mileage lines that do not follow a service line.
    pub enforce_mileage_adjacency: bool,
    /// Collapse per-trip submission channels into one claim value.
    pub aggregate_submission_channel: bool,
    /// Frequency code for trips that do not carry one.
    pub default_frequency: FrequencyCode,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            claim_number_prefix: "CLM".to_string(),
            validate_duplicates: true,
            enforce_mileage_adjacency: true,
            aggregate_submission_channel: true,
            default_frequency: FrequencyCode::Original,
        }
    }
}

impl BatchConfig {
    /// Set the claim-number prefix.
    #[must_use]
    pub fn with_claim_number_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.claim_number_prefix = prefix.into();
        self
    }

    /// Enable or disable duplicate detection.
    #[must_use]
    pub fn with_duplicate_validation(mut self, enable: bool) -> Self {
        self.validate_duplicates = enable;
        self
    }

    /// Enable or disable mileage adjacency checks.
    #[must_use]
    pub fn with_mileage_adjacency(mut self, enable: bool) -> Self {
        self.enforce_mileage_adjacency = enable;
        self
    }

    /// Enable or disable submission-channel aggregation.
    #[must_use]
    pub fn with_channel_aggregation(mut self, enable: bool) -> Self {
        self.aggregate_submission_channel = enable;
        self
    }

    /// Set the default frequency code.
    #[must_use]
    pub fn with_default_frequency(mut self, code: FrequencyCode) -> Self {
        self.default_frequency = code;
        self
    }
}
