//! Loops 1000A/1000B and the 2000A/2000B hierarchy.

use tracing::debug;

use crate::error::Result;
use crate::segments::{
    Hl, Nm1, contact, demographics, n3, n4, provider_taxonomy, reference, subscriber_info,
};

use super::ClaimWriter;

const BILLING_HL: u32 = 1;
const SUBSCRIBER_HL: u32 = 2;

impl ClaimWriter<'_> {
    /// 1000A submitter name and contact.
    pub(super) fn write_submitter(&mut self) -> Result<()> {
        let submitter = &self.claim.submitter;
        let name = Nm1::organization("41", &submitter.name)
            .with_id(&submitter.id_qualifier, &submitter.id);
        let contact_name = submitter
            .contact_name
            .as_deref()
            .unwrap_or(&submitter.name);
        let per = contact(contact_name, submitter.contact_phone.as_deref());
        self.put_all([name.build(), per])
    }

    /// 1000B receiver name.
    pub(super) fn write_receiver(&mut self) -> Result<()> {
        let receiver = Nm1::organization("40", &self.payer.payer_name)
            .with_id("46", &self.payer.payer_id);
        self.put(receiver.build())
    }

    /// 2000A billing provider level with 2010AA name, address and tax id.
    pub(super) fn write_billing_provider(&mut self) -> Result<()> {
        let provider = &self.claim.billing_provider;
        debug!(npi = %provider.npi, "writing billing provider");
        let mut segments = vec![
            Hl {
                id: BILLING_HL,
                parent: None,
                level: "20",
                has_children: true,
            }
            .build(),
        ];
        if let Some(taxonomy) = provider.taxonomy.as_deref().filter(|t| !t.is_empty()) {
            segments.push(provider_taxonomy("BI", taxonomy));
        }
        segments.push(
            Nm1::organization("85", &provider.name)
                .with_id("XX", &provider.npi)
                .build(),
        );
        let address = &provider.address;
        segments.push(n3(&address.line1, address.line2.as_deref()));
        segments.push(n4(&address.city, &address.state, &address.zip));
        if let Some(tax_id) = provider.tax_id.as_deref().filter(|t| !t.is_empty()) {
            segments.push(reference("EI", tax_id));
        }
        self.put_all(segments)
    }

    /// 2000B subscriber level with 2010BA subscriber and 2010BB payer.
    pub(super) fn write_subscriber(&mut self) -> Result<()> {
        let subscriber = &self.claim.subscriber;
        let mut segments = vec![
            Hl {
                id: SUBSCRIBER_HL,
                parent: Some(BILLING_HL),
                level: "22",
                has_children: false,
            }
            .build(),
            subscriber_info(),
            Nm1::person("IL", &subscriber.name.last, &subscriber.name.first)
                .with_id("MI", &subscriber.member_id)
                .build(),
        ];
        if let Some(address) = &subscriber.address {
            segments.push(n3(&address.line1, address.line2.as_deref()));
            segments.push(n4(&address.city, &address.state, &address.zip));
        }
        if let Some(dob) = subscriber.dob {
            segments.push(demographics(dob, subscriber.sex.code()));
        }
        segments.push(
            Nm1::organization("PR", &self.payer.payer_name)
                .with_id(&self.payer.qualifier, &self.payer.payer_id)
                .build(),
        );
        self.put_all(segments)
    }
}
