//! Claim encoder: validation, envelope and transaction sets.

use std::sync::Arc;

use tracing::{debug, info, info_span};

use nemt_model::Claim;
use nemt_x12::{
    ControlNumbers, Delimiters, GroupHeader, InterchangeHeader, X12Writer, format_time,
    pad_fixed,
};

use crate::clock::{Clock, SystemClock};
use crate::config::{EncoderConfig, IMPLEMENTATION_VERSION};
use crate::error::{EncodeError, Result};
use crate::loops::ClaimWriter;
use crate::segments::beginning;
use crate::validate::{ClaimValidator, FieldValidator, encoder_prerequisites};

const TRANSACTION_SET: &str = "837";
const FUNCTIONAL_ID: &str = "HC";
const BHT_REFERENCE_WIDTH: usize = 30;

/// Turns claims into 837P interchanges.
///
/// ```
/// use nemt_837p::{ClaimEncoder, EncoderConfig};
/// use nemt_x12::ControlNumbers;
///
/// let encoder = ClaimEncoder::new(EncoderConfig::default()).unwrap();
/// let mut control = ControlNumbers::new();
/// assert!(encoder.encode_batch(&[], &mut control).is_err());
/// ```
#[derive(Clone)]
pub struct ClaimEncoder {
    config: EncoderConfig,
    validator: Arc<dyn ClaimValidator>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ClaimEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimEncoder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ClaimEncoder {
    /// Encoder with the default field validator and the system clock.
    ///
    /// Fails when the delimiters are unusable or a configured ISA identifier
    /// does not fit its fixed width or carries a separator.
    pub fn new(config: EncoderConfig) -> Result<Self> {
        let d = &config.delimiters;
        d.validate()?;
        isa_field(d, "ISA05", &config.sender_qualifier, 2)?;
        isa_field(d, "ISA06", &config.sender_id, 15)?;
        isa_field(d, "ISA07", &config.receiver_qualifier, 2)?;
        isa_field(d, "ISA08", &config.receiver_id, 15)?;
        Ok(Self {
            config,
            validator: Arc::new(FieldValidator::new()),
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the field validator.
    #[must_use]
    pub fn with_validator(mut self, validator: impl ClaimValidator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    /// Replace the timestamp source.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    #[must_use]
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode one claim as a complete interchange.
    pub fn encode(&self, claim: &Claim, control: &mut ControlNumbers) -> Result<String> {
        self.encode_batch(std::slice::from_ref(claim), control)
    }

    /// Encode claims as one interchange with one transaction set per claim.
    ///
    /// Every claim and the resolved ISA identifiers are validated before
    /// anything is written. Control numbers are drawn only after that.
    pub fn encode_batch(&self, claims: &[Claim], control: &mut ControlNumbers) -> Result<String> {
        let _span = info_span!("encode", claims = claims.len()).entered();
        if claims.is_empty() {
            return Err(EncodeError::NoClaims);
        }
        for claim in claims {
            encoder_prerequisites(claim)?;
            let warnings = self.validator.validate(claim)?;
            debug!(
                claim = %claim.claim.claim_number,
                warnings = warnings.len(),
                "claim validated"
            );
        }

        let first = &claims[0];
        let now = self.clock.now();
        let sender_id = non_blank(&self.config.sender_id).unwrap_or(first.submitter.id.as_str());
        let receiver_id = non_blank(&self.config.receiver_id).unwrap_or_else(|| {
            self.config
                .payer
                .as_ref()
                .map_or(first.receiver.payer_id.as_str(), |p| p.payer_id.as_str())
        });
        // Fallback ids come from claim data, not the checked config.
        isa_field(&self.config.delimiters, "ISA06", sender_id, 15)?;
        isa_field(&self.config.delimiters, "ISA08", receiver_id, 15)?;

        let interchange_control = control.next_interchange();
        let isa = InterchangeHeader::new(
            (self.config.sender_qualifier.as_str(), sender_id),
            (self.config.receiver_qualifier.as_str(), receiver_id),
            now,
            interchange_control,
        )
        .with_usage(self.config.usage)
        .with_acknowledgment(self.config.acknowledgment_requested);
        let gs = GroupHeader {
            functional_id: FUNCTIONAL_ID.to_string(),
            application_sender: self
                .config
                .application_sender
                .clone()
                .unwrap_or_else(|| sender_id.trim().to_string()),
            application_receiver: self
                .config
                .application_receiver
                .clone()
                .unwrap_or_else(|| receiver_id.trim().to_string()),
            timestamp: now,
            control_number: control.next_group(),
            version: IMPLEMENTATION_VERSION.to_string(),
        };

        let mut out = X12Writer::new(self.config.delimiters)?
            .with_line_breaks(self.config.line_breaks);
        out.begin_interchange(&isa)?;
        out.begin_group(&gs)?;
        for claim in claims {
            let transaction = control.next_transaction();
            out.begin_transaction(TRANSACTION_SET, transaction, IMPLEMENTATION_VERSION)?;
            let reference: String = claim
                .claim
                .claim_number
                .trim()
                .chars()
                .take(BHT_REFERENCE_WIDTH)
                .collect();
            out.write(&beginning(
                &reference,
                now.date(),
                &format_time(now.time()),
            ))?;
            ClaimWriter::new(&mut out, claim, &self.config).write_body()?;
            let segments = out.end_transaction()?;
            debug!(
                claim = %claim.claim.claim_number,
                transaction,
                segments,
                "transaction set closed"
            );
        }
        out.end_group()?;
        out.end_interchange()?;
        let edi = out.finish()?;
        info!(
            claims = claims.len(),
            interchange = interchange_control,
            bytes = edi.len(),
            "encoded interchange"
        );
        Ok(edi)
    }
}

fn isa_field(
    delimiters: &Delimiters,
    field: &'static str,
    value: &str,
    width: usize,
) -> Result<()> {
    delimiters.check_raw(field, value)?;
    pad_fixed(field, value, width)?;
    Ok(())
}

fn non_blank(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

/// Encode one claim with fresh control numbers and the system clock.
pub fn encode(claim: &Claim, config: &EncoderConfig) -> Result<String> {
    let mut control = ControlNumbers::new();
    ClaimEncoder::new(config.clone())?.encode(claim, &mut control)
}
