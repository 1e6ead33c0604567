//! Encoder configuration.

use serde::{Deserialize, Serialize};

use nemt_model::PayerProfile;
use nemt_x12::{Delimiters, UsageIndicator};

/// GS08 / ST03 implementation convention reference.
pub const IMPLEMENTATION_VERSION: &str = "005010X222A1";

/// Where ambulance pickup and dropoff addresses are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    /// Addresses flattened into CR109/CR110; no claim-level 2310E/F loops.
    #[default]
    Inline,
    /// Addresses emitted as 2310E/2310F name/address loops.
    #[serde(alias = "separate")]
    SeparateLoops,
}

/// Adjustment and remark applied to denied claims that carry neither.
///
/// CO-45 ("charge exceeds fee schedule") with remark N381 is a payer-policy
/// default and should be confirmed with each payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenialDefaults {
    pub enabled: bool,
    pub group_code: String,
    pub reason_code: String,
    pub remark_code: String,
}

impl Default for DenialDefaults {
    fn default() -> Self {
        Self {
            enabled: true,
            group_code: "CO".to_string(),
            reason_code: "45".to_string(),
            remark_code: "N381".to_string(),
        }
    }
}

/// Options for [`crate::ClaimEncoder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// ISA05 interchange sender qualifier.
    pub sender_qualifier: String,
    /// ISA06 interchange sender id; falls back to the submitter id.
    pub sender_id: String,
    /// ISA07 interchange receiver qualifier.
    pub receiver_qualifier: String,
    /// ISA08 interchange receiver id; falls back to the payer id.
    pub receiver_id: String,
    /// GS02 application sender code; falls back to the ISA sender id.
    pub application_sender: Option<String>,
    /// GS03 application receiver code; falls back to the ISA receiver id.
    pub application_receiver: Option<String>,
    pub usage: UsageIndicator,
    pub acknowledgment_requested: bool,
    /// Overrides the payer identity in loop 2010BB.
    pub payer: Option<PayerProfile>,
    pub location_mode: LocationMode,
    pub delimiters: Delimiters,
    /// Put each segment on its own line.
    pub line_breaks: bool,
    pub denial_defaults: DenialDefaults,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            sender_qualifier: "ZZ".to_string(),
            sender_id: String::new(),
            receiver_qualifier: "ZZ".to_string(),
            receiver_id: String::new(),
            application_sender: None,
            application_receiver: None,
            usage: UsageIndicator::Test,
            acknowledgment_requested: false,
            payer: None,
            location_mode: LocationMode::Inline,
            delimiters: Delimiters::default(),
            line_breaks: false,
            denial_defaults: DenialDefaults::default(),
        }
    }
}

impl EncoderConfig {
    /// Set the interchange sender.
    #[must_use]
    pub fn with_sender(mut self, qualifier: impl Into<String>, id: impl Into<String>) -> Self {
        self.sender_qualifier = qualifier.into();
        self.sender_id = id.into();
        self
    }

    /// Set the interchange receiver.
    #[must_use]
    pub fn with_receiver(mut self, qualifier: impl Into<String>, id: impl Into<String>) -> Self {
        self.receiver_qualifier = qualifier.into();
        self.receiver_id = id.into();
        self
    }

    /// Set the GS application sender and receiver codes.
    #[must_use]
    pub fn with_application_codes(
        mut self,
        sender: impl Into<String>,
        receiver: impl Into<String>,
    ) -> Self {
        self.application_sender = Some(sender.into());
        self.application_receiver = Some(receiver.into());
        self
    }

    #[must_use]
    pub fn with_usage(mut self, usage: UsageIndicator) -> Self {
        self.usage = usage;
        self
    }

    #[must_use]
    pub fn with_payer(mut self, payer: PayerProfile) -> Self {
        self.payer = Some(payer);
        self
    }

    #[must_use]
    pub fn with_location_mode(mut self, mode: LocationMode) -> Self {
        self.location_mode = mode;
        self
    }

    #[must_use]
    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    #[must_use]
    pub fn with_line_breaks(mut self, enable: bool) -> Self {
        self.line_breaks = enable;
        self
    }

    #[must_use]
    pub fn with_denial_defaults(mut self, defaults: DenialDefaults) -> Self {
        self.denial_defaults = defaults;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_is_the_default_mode() {
        assert_eq!(EncoderConfig::default().location_mode, LocationMode::Inline);
    }

    #[test]
    fn builders_chain() {
        let config = EncoderConfig::default()
            .with_sender("ZZ", "SUBMIT01")
            .with_receiver("30", "87726")
            .with_usage(UsageIndicator::Production)
            .with_location_mode(LocationMode::SeparateLoops);
        assert_eq!(config.sender_id, "SUBMIT01");
        assert_eq!(config.receiver_qualifier, "30");
        assert_eq!(config.usage, UsageIndicator::Production);
        assert_eq!(config.location_mode, LocationMode::SeparateLoops);
    }
}
