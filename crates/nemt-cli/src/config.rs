//! TOML configuration file.
//!
//! ```toml
//! [encoder]
//! sender_id = "ACME"
//! receiver_id = "87726"
//! location_mode = "separate"
//!
//! [batch]
//! claim_number_prefix = "NEMT"
//!
//! [defaults.submitter]
//! name = "ACME TRANSPORT"
//! id = "SUB01"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use nemt_837p::{EncoderConfig, LocationMode};
use nemt_batch::BatchConfig;
use nemt_model::{CommonDefaults, PayerProfile};
use nemt_x12::UsageIndicator;

/// Everything a command can take from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub encoder: EncoderConfig,
    pub batch: BatchConfig,
    /// Batch defaults; a `--defaults` JSON file replaces them.
    pub defaults: CommonDefaults,
}

impl ToolConfig {
    /// Load from `path`, or defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parse config {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}

/// Command-line values that replace individual encoder settings.
#[derive(Debug, Clone, Default)]
pub struct EncoderOverrides {
    pub sender_qualifier: Option<String>,
    pub sender_id: Option<String>,
    pub receiver_qualifier: Option<String>,
    pub receiver_id: Option<String>,
    pub application_sender: Option<String>,
    pub application_receiver: Option<String>,
    pub usage: Option<UsageIndicator>,
    /// Key of a predefined payer profile.
    pub payer: Option<String>,
    pub location_mode: Option<LocationMode>,
}

impl EncoderOverrides {
    /// Apply every override that is set.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown payer profile key.
    pub fn apply(self, mut config: EncoderConfig) -> Result<EncoderConfig> {
        if let Some(qualifier) = self.sender_qualifier {
            config.sender_qualifier = qualifier;
        }
        if let Some(id) = self.sender_id {
            config.sender_id = id;
        }
        if let Some(qualifier) = self.receiver_qualifier {
            config.receiver_qualifier = qualifier;
        }
        if let Some(id) = self.receiver_id {
            config.receiver_id = id;
        }
        if self.application_sender.is_some() {
            config.application_sender = self.application_sender;
        }
        if self.application_receiver.is_some() {
            config.application_receiver = self.application_receiver;
        }
        if let Some(usage) = self.usage {
            config = config.with_usage(usage);
        }
        if let Some(key) = self.payer {
            let profile = PayerProfile::by_key(&key).context("resolve --payer")?;
            config = config.with_payer(profile);
        }
        if let Some(mode) = self.location_mode {
            config = config.with_location_mode(mode);
        }
        Ok(config)
    }
}
