//! Loop 2400 service lines with their 2420 and 2430 children.

use tracing::debug;

use nemt_model::{PaymentStatus, ServiceLine};
use nemt_x12::Segment;

use crate::error::Result;
use crate::segments::{
    Svd, Sv1, adjustment, date, k3, keyed_text, line_number, note, remark, trip_reference,
};

use super::ClaimWriter;
use super::provider::{entity, location_loop, supervising_loop};

fn yes_no(flag: bool) -> String {
    if flag { "Y" } else { "N" }.to_string()
}

impl ClaimWriter<'_> {
    pub(super) fn write_service_line(&mut self, number: usize, line: &ServiceLine) -> Result<()> {
        let claim = self.claim;
        let trip_number = claim.line_trip_number(line);
        let status = claim.line_payment_status(line);
        debug!(line = number, hcpcs = %line.hcpcs, "writing service line");

        let mut segments = vec![
            line_number(number),
            Sv1 {
                hcpcs: line.hcpcs.clone(),
                modifiers: line.modifiers.clone(),
                charge: line.charge,
                units: line.units,
                place_of_service: claim.line_place_of_service(line).trim().to_string(),
                diagnosis_pointer: claim
                    .claim
                    .diagnoses
                    .iter()
                    .any(|d| !d.trim().is_empty())
                    .then(|| "1".to_string()),
                emergency: line.emergency.unwrap_or(false),
            }
            .build(),
        ];
        if let Some(dos) = line.dos.or(claim.claim.from) {
            segments.push(date("472", dos, None));
        }

        let locations = keyed_text([
            ("PULOC", line.pickup_location_code.clone()),
            ("PUTIME", line.pickup_time.clone()),
            ("DOLOC", line.dropoff_location_code.clone()),
            ("DOTIME", line.dropoff_time.clone()),
        ]);
        if let Some(text) = locations {
            segments.push(note(&text));
        }
        let trip = &line.trip;
        let metadata = keyed_text([
            ("TRIPTYPE", trip.trip_type.clone()),
            ("TRIPLEG", trip.trip_leg.clone()),
            ("VAS", trip.value_added_service.map(yes_no)),
            ("TRANTYPE", trip.transport_type.clone()),
            ("APPTTIME", trip.appointment_time.clone()),
            ("SCHPUTIME", trip.scheduled_pickup_time.clone()),
            ("TRIPRSN", trip.trip_reason.clone()),
            ("ARRIVTIME", trip.arrival_time.clone()),
            ("DEPRTTIME", trip.departure_time.clone()),
            ("TRIPNUM", trip_number.map(trip_reference)),
        ]);
        if let Some(text) = metadata {
            segments.push(note(&text));
        }

        if let Some(status) = status {
            segments.push(k3(&format!("PYMS-{}", status.code())));
        }
        segments.extend(self.line_denial(line, status));

        if let Some(supervising) = &line.supervising_provider {
            segments.extend(supervising_loop(supervising, trip_number));
        }
        if let Some(pickup) = &line.pickup {
            segments.extend(location_loop(entity::PICKUP, pickup));
        }
        if let Some(dropoff) = &line.dropoff {
            segments.extend(location_loop(entity::DROPOFF, dropoff));
        }
        segments.extend(self.line_adjudication(line));
        self.put_all(segments)
    }

    /// Line CAS and LQ, falling back to the denial defaults.
    fn line_denial(
        &self,
        line: &ServiceLine,
        status: Option<PaymentStatus>,
    ) -> Vec<Segment> {
        let defaults = &self.config.denial_defaults;
        let denied = self.denial_default_applies(status);
        let mut segments: Vec<Segment> = line
            .adjustments
            .iter()
            .map(|cas| adjustment(&cas.group_code, &cas.reason_code, cas.amount, cas.quantity))
            .collect();
        if segments.is_empty() && denied {
            segments.push(adjustment(
                &defaults.group_code,
                &defaults.reason_code,
                line.charge,
                None,
            ));
        }
        if line.remark_codes.is_empty() {
            if denied {
                segments.push(remark(&defaults.remark_code));
            }
        } else {
            segments.extend(line.remark_codes.iter().map(|code| remark(code)));
        }
        segments
    }

    /// 2430 line adjudication: SVD, its CAS segments and the adjudication date.
    fn line_adjudication(&self, line: &ServiceLine) -> Vec<Segment> {
        let adjudication_date = self.claim.claim.lifecycle.adjudication_date;
        let mut segments = Vec::new();
        for adjudication in &line.adjudication {
            let payer_id = adjudication
                .payer_id
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| self.payer.payer_id.clone());
            segments.push(
                Svd {
                    payer_id,
                    paid_amount: adjudication.paid_amount,
                    hcpcs: line.hcpcs.clone(),
                    modifiers: line.modifiers.clone(),
                    paid_units: adjudication.paid_units,
                }
                .build(),
            );
            segments.extend(adjudication.adjustments.iter().map(|cas| {
                adjustment(&cas.group_code, &cas.reason_code, cas.amount, cas.quantity)
            }));
            if let Some(adjudicated) = adjudication_date {
                segments.push(date("573", adjudicated, None));
            }
        }
        segments
    }
}
