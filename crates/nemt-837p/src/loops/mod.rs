//! Loop writers for one 837P transaction set body.
//!
//! Every writer appends segments through [`ClaimWriter`], which owns no
//! state beyond the claim being written and the resolved payer.

mod claim;
mod header;
mod provider;
mod service;

use nemt_model::{Claim, PaymentStatus, PayerProfile};
use nemt_x12::{Segment, X12Writer};

use crate::config::{EncoderConfig, LocationMode};
use crate::error::Result;

pub(crate) struct ClaimWriter<'a> {
    out: &'a mut X12Writer,
    claim: &'a Claim,
    config: &'a EncoderConfig,
    payer: PayerProfile,
}

impl<'a> ClaimWriter<'a> {
    pub(crate) fn new(out: &'a mut X12Writer, claim: &'a Claim, config: &'a EncoderConfig) -> Self {
        let payer = config.payer.clone().unwrap_or_else(|| {
            PayerProfile::custom(&claim.receiver.payer_id, &claim.receiver.payer_name)
        });
        Self {
            out,
            claim,
            config,
            payer,
        }
    }

    /// Write every loop from 1000A through 2430, in order.
    pub(crate) fn write_body(&mut self) -> Result<()> {
        self.write_submitter()?;
        self.write_receiver()?;
        self.write_billing_provider()?;
        self.write_subscriber()?;
        self.write_claim()?;
        self.write_claim_providers()?;
        let claim = self.claim;
        for (idx, line) in claim.services.iter().enumerate() {
            self.write_service_line(idx + 1, line)?;
        }
        Ok(())
    }

    fn put(&mut self, segment: Segment) -> Result<()> {
        self.out.write(&segment)?;
        Ok(())
    }

    fn put_all(&mut self, segments: impl IntoIterator<Item = Segment>) -> Result<()> {
        for segment in segments {
            self.put(segment)?;
        }
        Ok(())
    }

    fn inline_locations(&self) -> bool {
        self.config.location_mode == LocationMode::Inline
    }

    /// Whether the denial default applies to something with this status.
    fn denial_default_applies(&self, status: Option<PaymentStatus>) -> bool {
        self.config.denial_defaults.enabled && status == Some(PaymentStatus::Denied)
    }
}
