//! Trip-to-claim grouping.
//!
//! Trips sharing (date of service, member, rendering NPI, billing NPI) become
//! one claim with one service line per trip. Claims come out in the order
//! their key first appears in the input.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info, info_span, warn};

use nemt_model::codes::DEFAULT_PLACE_OF_SERVICE;
use nemt_model::{
    AmbulanceBlock, Claim, ClaimHeader, CommonDefaults, FrequencyCode, ProviderRef, ServiceLine,
    SubmissionChannel, Trip, is_mileage_code,
};

use crate::config::BatchConfig;
use crate::numbering::{ClaimNumberSource, TimestampClaimNumbers};
use crate::report::{
    BatchIssue, BatchReport, CONSECUTIVE_MILEAGE, DUPLICATE_CLAIM, EMPTY_BATCH, MILEAGE_FIRST,
    MILEAGE_PAIRED, MISSING_DOS, MISSING_HCPCS, MISSING_MEMBER, MISSING_SERVICE, TRIPS_GROUPED,
};

/// Identity of one claim within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub dos: NaiveDate,
    pub member_id: String,
    pub rendering_npi: String,
    pub billing_npi: String,
}

/// Insertion-ordered grouping: key → position, plus the groups themselves.
#[derive(Debug, Default)]
struct OrderedGroups<'a> {
    index: HashMap<GroupKey, usize>,
    groups: Vec<(GroupKey, Vec<&'a Trip>)>,
}

impl<'a> OrderedGroups<'a> {
    fn insert(&mut self, key: GroupKey, trip: &'a Trip) {
        match self.index.get(&key) {
            Some(&position) => self.groups[position].1.push(trip),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![trip]));
            }
        }
    }
}

/// Claims plus the report describing how they were produced.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub claims: Vec<Claim>,
    pub report: BatchReport,
}

/// Groups trips into claims using an injected claim-number source.
pub struct BatchGrouper<N: ClaimNumberSource> {
    config: BatchConfig,
    numbers: N,
}

impl BatchGrouper<TimestampClaimNumbers> {
    /// Grouper stamping claim numbers from the system clock.
    #[must_use]
    pub fn with_system_clock(config: BatchConfig) -> Self {
        let numbers = TimestampClaimNumbers::from_system_clock(config.claim_number_prefix.clone());
        Self::new(config, numbers)
    }
}

impl<N: ClaimNumberSource> BatchGrouper<N> {
    pub fn new(config: BatchConfig, numbers: N) -> Self {
        Self { config, numbers }
    }

    #[must_use]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Group trips into claims.
    ///
    /// When any trip lacks a required field the report carries one ERROR per
    /// missing field and no claims are returned.
    pub fn group(&mut self, trips: &[Trip], defaults: &CommonDefaults) -> BatchOutcome {
        let span = info_span!("batch", trips = trips.len());
        let _guard = span.enter();
        let mut report = BatchReport::new(trips.len());

        if trips.is_empty() {
            report.add_issue(BatchIssue::error(EMPTY_BATCH, "batch contains no trips"));
            return BatchOutcome {
                claims: Vec::new(),
                report,
            };
        }

        if !check_required_fields(trips, &mut report) {
            warn!(
                errors = report.error_count(),
                "trips missing required fields; no claims generated"
            );
            return BatchOutcome {
                claims: Vec::new(),
                report,
            };
        }

        let mut ordered = OrderedGroups::default();
        for trip in trips {
            if let Some(key) = group_key(trip, defaults) {
                ordered.insert(key, trip);
            }
        }

        let mut claims = Vec::with_capacity(ordered.groups.len());
        for (key, members) in &ordered.groups {
            let claim = self.build_claim(members, defaults);
            debug!(
                claim_number = %claim.claim.claim_number,
                dos = %key.dos,
                lines = claim.services.len(),
                "assembled claim"
            );
            if members.len() > 1 {
                report.add_issue(
                    BatchIssue::info(
                        TRIPS_GROUPED,
                        format!("{} trips grouped into one claim", members.len()),
                    )
                    .for_claim(&claim.claim.claim_number),
                );
            }
            claims.push(claim);
        }

        if self.config.validate_duplicates {
            check_duplicates(&claims, &mut report);
        }
        if self.config.enforce_mileage_adjacency {
            for claim in &claims {
                check_mileage_adjacency(claim, &mut report);
            }
        }

        report.claims_generated = claims.len();
        info!(
            claims = claims.len(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            "batch grouped"
        );
        BatchOutcome { claims, report }
    }

    fn build_claim(&mut self, trips: &[&Trip], defaults: &CommonDefaults) -> Claim {
        let Some(first) = trips.first().copied() else {
            return Claim::default();
        };
        let single = trips.len() == 1;

        let claim_number = first
            .claim_number
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.numbers.next_claim_number());
        let place_of_service = first
            .pos
            .clone()
            .or_else(|| defaults.pos.clone())
            .unwrap_or_else(|| DEFAULT_PLACE_OF_SERVICE.to_string());

        let services: Vec<ServiceLine> = trips
            .iter()
            .map(|t| service_line(t, single, first.supervising_provider.as_ref()))
            .collect();
        let total_charge = services.iter().map(|s| s.charge).sum();

        let submission_channel = if self.config.aggregate_submission_channel {
            aggregate_channel(trips)
        } else {
            first.submission_channel
        };

        let header = ClaimHeader {
            claim_number,
            total_charge,
            from: first.dos,
            to: first.dos,
            place_of_service,
            frequency_code: Some(first.frequency_code.unwrap_or(self.config.default_frequency)),
            adjustment_type: None,
            original_claim_number: first.original_claim_number.clone(),
            diagnoses: first.diagnoses.clone(),
            authorization: first.authorization.clone(),
            tracking_number: None,
            patient_account: first.patient_account.clone(),
            payment_status: first.payment_status,
            submission_channel,
            network_indicator: first.network_indicator,
            subscriber_internal_id: first.subscriber_internal_id.clone(),
            ip_address: first.ip_address.clone(),
            user_id: first.user_id.clone(),
            lifecycle: first.lifecycle.clone(),
            adjustments: Vec::new(),
            remark_codes: Vec::new(),
            member_group: first.member_group.clone(),
            ambulance: ambulance_block(first, single),
            supervising_provider: first.supervising_provider.clone(),
        };

        Claim {
            submitter: defaults.submitter.clone().unwrap_or_default(),
            receiver: first
                .payer
                .clone()
                .or_else(|| defaults.payer.clone())
                .unwrap_or_default(),
            billing_provider: first
                .billing_provider
                .clone()
                .or_else(|| defaults.billing_provider.clone())
                .unwrap_or_default(),
            subscriber: first.member.clone().unwrap_or_default(),
            claim: header,
            services,
            rendering_provider: first.rendering_provider.clone(),
            referring_provider: first.referring_provider.clone(),
            service_facility: None,
        }
    }
}

/// Group with default configuration and system-clock claim numbers.
pub fn group_trips(trips: &[Trip], defaults: &CommonDefaults) -> BatchOutcome {
    BatchGrouper::with_system_clock(BatchConfig::default()).group(trips, defaults)
}

fn check_required_fields(trips: &[Trip], report: &mut BatchReport) -> bool {
    let before = report.error_count();
    for (index, trip) in trips.iter().enumerate() {
        if trip.dos.is_none() {
            report.add_issue(
                BatchIssue::error(MISSING_DOS, "trip has no date of service")
                    .at_trip(index)
                    .on_field("dos"),
            );
        }
        if trip.member_id().is_none_or(|id| id.trim().is_empty()) {
            report.add_issue(
                BatchIssue::error(MISSING_MEMBER, "trip has no member")
                    .at_trip(index)
                    .on_field("member.member_id"),
            );
        }
        if trip.service.is_none() {
            report.add_issue(
                BatchIssue::error(MISSING_SERVICE, "trip has no service")
                    .at_trip(index)
                    .on_field("service"),
            );
        } else if trip.hcpcs().is_none() {
            report.add_issue(
                BatchIssue::error(MISSING_HCPCS, "trip service has no HCPCS code")
                    .at_trip(index)
                    .on_field("service.hcpcs"),
            );
        }
    }
    report.error_count() == before
}

fn group_key(trip: &Trip, defaults: &CommonDefaults) -> Option<GroupKey> {
    let rendering_npi = trip
        .rendering_provider
        .as_ref()
        .and_then(|p| p.npi())
        .unwrap_or_default()
        .to_string();
    let billing_npi = trip
        .billing_provider
        .as_ref()
        .or(defaults.billing_provider.as_ref())
        .map(|b| b.npi.trim().to_string())
        .unwrap_or_default();
    Some(GroupKey {
        dos: trip.dos?,
        member_id: trip.member_id()?.trim().to_string(),
        rendering_npi,
        billing_npi,
    })
}

fn service_line(trip: &Trip, single: bool, claim_supervisor: Option<&ProviderRef>) -> ServiceLine {
    let service = trip.service.clone().unwrap_or_default();
    let mut line = ServiceLine::new(trip.hcpcs().unwrap_or_default(), service.charge);
    line.modifiers = service.modifiers;
    line.units = service.units.unwrap_or(1.0);
    line.place_of_service = trip.pos.clone();
    line.dos = trip.dos;
    line.emergency = trip.emergency;
    line.pickup_location_code = trip.pickup_location_code.clone();
    line.pickup_time = trip.pickup_time.clone();
    line.dropoff_location_code = trip.dropoff_location_code.clone();
    line.dropoff_time = trip.dropoff_time.clone();
    line.trip = trip.metadata.clone();
    line.trip_number = trip.trip_number;
    line.payment_status = trip.payment_status;
    // 2420D only when the line's supervisor differs from the claim's 2310D.
    line.supervising_provider = trip
        .supervising_provider
        .clone()
        .filter(|p| Some(p) != claim_supervisor);
    line.adjudication = trip.adjudication.clone();
    // A lone trip's addresses travel with the claim-level ambulance block.
    if !single {
        line.pickup = trip.pickup.clone();
        line.dropoff = trip.dropoff.clone();
    }
    line
}

fn ambulance_block(first: &Trip, single: bool) -> Option<AmbulanceBlock> {
    let has_location = single && (first.pickup.is_some() || first.dropoff.is_some());
    if first.ambulance.is_none() && first.trip_number.is_none() && !has_location {
        return None;
    }
    let mut block = first.ambulance.clone().unwrap_or_default();
    if block.trip_number.is_none() {
        block.trip_number = first.trip_number;
    }
    if single {
        if block.pickup.is_none() {
            block.pickup = first.pickup.clone();
        }
        if block.dropoff.is_none() {
            block.dropoff = first.dropoff.clone();
        }
    }
    Some(block)
}

/// Any electronic submission makes the claim electronic; otherwise the first
/// channel seen wins.
fn aggregate_channel(trips: &[&Trip]) -> Option<SubmissionChannel> {
    let mut first_seen = None;
    for channel in trips.iter().filter_map(|t| t.submission_channel) {
        if channel == SubmissionChannel::Electronic {
            return Some(channel);
        }
        first_seen.get_or_insert(channel);
    }
    first_seen
}

fn check_duplicates(claims: &[Claim], report: &mut BatchReport) {
    let mut seen: HashSet<(String, FrequencyCode, Option<String>)> = HashSet::new();
    for claim in claims {
        let key = (
            claim.claim.claim_number.clone(),
            claim.claim.resolved_frequency(),
            claim.claim.original_reference().map(str::to_string),
        );
        if !seen.insert(key) {
            report.add_issue(
                BatchIssue::error(
                    DUPLICATE_CLAIM,
                    format!(
                        "duplicate claim {} with frequency {}",
                        claim.claim.claim_number,
                        claim.claim.resolved_frequency()
                    ),
                )
                .for_claim(&claim.claim.claim_number),
            );
        }
    }
}

fn check_mileage_adjacency(claim: &Claim, report: &mut BatchReport) {
    let number = &claim.claim.claim_number;
    let mut previous_mileage: Option<bool> = None;
    for (position, line) in claim.services.iter().enumerate() {
        let mileage = is_mileage_code(&line.hcpcs);
        match (previous_mileage, mileage) {
            (None, true) => report.add_issue(
                BatchIssue::warning(
                    MILEAGE_FIRST,
                    format!("line 1 bills mileage ({}) before any service", line.hcpcs),
                )
                .for_claim(number),
            ),
            (Some(true), true) => report.add_issue(
                BatchIssue::warning(
                    CONSECUTIVE_MILEAGE,
                    format!(
                        "line {} bills mileage ({}) directly after another mileage line",
                        position + 1,
                        line.hcpcs
                    ),
                )
                .for_claim(number),
            ),
            (Some(false), true) => report.add_issue(
                BatchIssue::info(
                    MILEAGE_PAIRED,
                    format!("line {} mileage follows its service line", position + 1),
                )
                .for_claim(number),
            ),
            _ => {}
        }
        previous_mileage = Some(mileage);
    }
}
