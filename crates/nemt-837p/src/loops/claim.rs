//! Loop 2300 claim information.

use tracing::debug;

use nemt_model::{AmbulanceBlock, MemberGroup};
use nemt_x12::{Segment, format_date};

use crate::error::Result;
use crate::segments::{
    Clm, Cr1, adjustment, amount, date, diagnoses, k3, keyed_text, note, reference, remarks,
    trip_reference,
};

use super::ClaimWriter;

impl ClaimWriter<'_> {
    pub(super) fn write_claim(&mut self) -> Result<()> {
        let claim = self.claim;
        let header = &claim.claim;
        let frequency = header.resolved_frequency();
        debug!(
            claim = %header.claim_number,
            frequency = %frequency,
            lines = claim.services.len(),
            "writing claim loop"
        );

        let mut segments = vec![
            Clm {
                claim_number: header.claim_number.trim().to_string(),
                total_charge: header.total_charge,
                place_of_service: header.place_of_service.trim().to_string(),
                frequency_code: frequency.code(),
            }
            .build(),
        ];
        if let Some(from) = header.from {
            segments.push(date("434", from, header.through()));
        }
        segments.extend(diagnoses(&header.diagnoses));

        let references = [
            ("G1", header.authorization.as_deref()),
            ("D9", header.tracking_number.as_deref()),
            ("F8", header.original_reference()),
            ("EA", header.patient_account.as_deref()),
        ];
        for (qualifier, value) in references {
            if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
                segments.push(reference(qualifier, value));
            }
        }

        let lifecycle = &header.lifecycle;
        if let Some(text) = keyed_text([
            ("DREC", lifecycle.received_date.map(format_date)),
            ("DADJ", lifecycle.adjudication_date.map(format_date)),
            ("PAIDDT", lifecycle.paid_date.map(format_date)),
        ]) {
            segments.push(k3(&text));
        }
        let amounts = [
            ("B6", lifecycle.allowed_amount),
            ("A8", lifecycle.not_covered_amount),
            ("F5", lifecycle.patient_paid_amount),
        ];
        for (qualifier, value) in amounts {
            if let Some(value) = value {
                segments.push(amount(qualifier, value));
            }
        }

        segments.extend(self.claim_adjudication());

        if let Some(status) = header.payment_status {
            segments.push(k3(&format!("PYMS-{}", status.code())));
        }
        if let Some(text) = keyed_text([
            ("SUB", header.subscriber_internal_id.clone()),
            ("IPAD", header.ip_address.clone()),
            ("USER", header.user_id.clone()),
        ]) {
            segments.push(k3(&text));
        }
        if let Some(network) = header.network_indicator {
            segments.push(k3(&format!("SNWK-{}", network.code())));
        }
        if let Some(channel) = header.submission_channel {
            segments.push(k3(&format!("TRPN-{}", channel.transmission_code())));
        }
        if let Some(group) = &header.member_group {
            segments.push(note(&member_group_text(group)));
        }
        if let Some(ambulance) = &header.ambulance {
            segments.extend(self.ambulance_block(ambulance));
        }
        self.put_all(segments)
    }

    /// Claim-level CAS and MOA, falling back to the denial defaults.
    fn claim_adjudication(&self) -> Vec<Segment> {
        let header = &self.claim.claim;
        let defaults = &self.config.denial_defaults;
        let denied = self.denial_default_applies(header.payment_status);
        let mut segments: Vec<Segment> = header
            .adjustments
            .iter()
            .map(|cas| adjustment(&cas.group_code, &cas.reason_code, cas.amount, cas.quantity))
            .collect();
        if segments.is_empty() && denied {
            segments.push(adjustment(
                &defaults.group_code,
                &defaults.reason_code,
                header.total_charge,
                None,
            ));
        }
        if !header.remark_codes.is_empty() {
            segments.push(remarks(&header.remark_codes));
        } else if denied {
            segments.push(remarks(&[defaults.remark_code.as_str()]));
        }
        segments
    }

    /// CR1 and the trip-detail note.
    fn ambulance_block(&self, ambulance: &AmbulanceBlock) -> Vec<Segment> {
        let inline = self.inline_locations();
        let cr1 = Cr1 {
            weight_unit: Some(ambulance.weight_unit.code()),
            weight: ambulance.patient_weight,
            transport_code: ambulance.transport_code.clone(),
            transport_reason: ambulance.transport_reason.clone(),
            trip_number: ambulance.trip_number,
            pickup: ambulance.pickup.as_ref().filter(|_| inline).map(|a| a.flatten()),
            dropoff: ambulance.dropoff.as_ref().filter(|_| inline).map(|a| a.flatten()),
        };
        let mut segments = vec![cr1.build()];
        let detail = keyed_text([
            ("TRIPNUM", ambulance.trip_number.map(trip_reference)),
            (
                "SPECNEED",
                ambulance
                    .special_needs
                    .map(|s| if s { "Y" } else { "N" }.to_string()),
            ),
            ("ATTENDTY", ambulance.attendant_type.clone()),
            ("ACCOMP", ambulance.accompanying_count.map(|n| n.to_string())),
            ("PUIND", ambulance.pickup_indicator.clone()),
            ("TRIPREQ", ambulance.requested_date.map(format_date)),
        ]);
        if let Some(detail) = detail {
            segments.push(note(&detail));
        }
        segments
    }
}

/// `GRP-;SGR-;CLS-;PLN-;PRD-` with every key present.
fn member_group_text(group: &MemberGroup) -> String {
    format!(
        "GRP-{};SGR-{};CLS-{};PLN-{};PRD-{}",
        group.group_id.trim(),
        group.sub_group_id.trim(),
        group.class_id.trim(),
        group.plan_id.trim(),
        group.product_id.trim()
    )
}
