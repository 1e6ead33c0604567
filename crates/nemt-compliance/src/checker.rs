//! Structural checks over parsed segments.

use tracing::{debug, info, info_span, warn};

use nemt_model::{Severity, is_mileage_code};

use crate::parse::{ParsedSegment, Separators, parse_segments};
use crate::report::{
    CONSECUTIVE_MILEAGE, CONTROL_MISMATCH, ComplianceIssue, ComplianceReport, DROPOFF_BOTH_LEVELS,
    GROUP_MISMATCH, K3_AFTER_PROVIDER, MILEAGE_FIRST, MISSING_CLAIM, MISSING_CR1, MISSING_IEA,
    MISSING_ISA, PARSE_FAILED, PICKUP_BOTH_LEVELS, SEGMENT_COUNT, TRANSACTION_MISMATCH,
    UNUSUAL_QUALIFIER,
};

/// NM101 entity identifiers expected in an NEMT 837P.
pub const KNOWN_ENTITY_QUALIFIERS: &[&str] = &[
    "41", "40", "85", "IL", "PR", "82", "DN", "P3", "77", "DK", "DQ", "PW", "45",
];

/// Read-only structural checker for 837P interchanges.
#[derive(Debug, Clone)]
pub struct ComplianceChecker {
    qualifiers: Vec<String>,
}

impl Default for ComplianceChecker {
    fn default() -> Self {
        Self {
            qualifiers: KNOWN_ENTITY_QUALIFIERS
                .iter()
                .map(|q| (*q).to_string())
                .collect(),
        }
    }
}

impl ComplianceChecker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept an additional NM1 entity identifier without an INFO finding.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifiers.push(qualifier.into());
        self
    }

    /// Check an interchange. Never fails; every finding lands in the report.
    #[must_use]
    pub fn check(&self, edi: &str) -> ComplianceReport {
        let _span = info_span!("check", bytes = edi.len()).entered();
        let separators = Separators::detect(edi);
        let segments = parse_segments(edi, separators);
        let transaction_count = segments.iter().filter(|s| s.is("ST")).count();
        let mut report = ComplianceReport::new(segments.len(), transaction_count);

        if segments.is_empty() {
            report.add_issue(ComplianceIssue::error(
                PARSE_FAILED,
                "no segments found in EDI content",
            ));
        } else {
            debug!(segments = segments.len(), ?separators, "parsed interchange");
            check_envelope(&segments, &mut report);
            for transaction in transactions(&segments) {
                check_loop_hierarchy(transaction, &mut report);
                for claim in claims(transaction) {
                    check_segment_ordering(claim, &mut report);
                    check_mileage_adjacency(claim, separators.component, &mut report);
                }
            }
            check_ambulance_data(&segments, &mut report);
            self.check_qualifiers(&segments, &mut report);
        }

        for issue in report.issues_by_severity(Severity::Warning) {
            warn!(code = issue.code, "{}", issue.message);
        }
        info!(
            compliant = report.is_compliant(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            "compliance check complete"
        );
        report
    }

    fn check_qualifiers(&self, segments: &[ParsedSegment], report: &mut ComplianceReport) {
        for segment in segments.iter().filter(|s| s.is("NM1")) {
            let qualifier = segment.element(1).unwrap_or_default();
            if !self.qualifiers.iter().any(|q| q == qualifier) {
                report.add_issue(
                    ComplianceIssue::info(
                        UNUSUAL_QUALIFIER,
                        format!("unusual NM1 entity qualifier '{qualifier}'"),
                    )
                    .at("NM1", segment.index)
                    .expected(format!("one of {}", self.qualifiers.join(", ")), qualifier),
                );
            }
        }
    }
}

/// Check with the default qualifier set.
#[must_use]
pub fn check(edi: &str) -> ComplianceReport {
    ComplianceChecker::new().check(edi)
}

fn count(segments: &[ParsedSegment], tag: &str) -> usize {
    segments.iter().filter(|s| s.is(tag)).count()
}

fn check_envelope(segments: &[ParsedSegment], report: &mut ComplianceReport) {
    if let Some(first) = segments.first().filter(|s| !s.is("ISA")) {
        report.add_issue(
            ComplianceIssue::error(MISSING_ISA, "interchange must start with ISA")
                .at(&first.tag, first.index)
                .expected("ISA", first.tag.as_str()),
        );
    }
    if let Some(last) = segments.last().filter(|s| !s.is("IEA")) {
        report.add_issue(
            ComplianceIssue::error(MISSING_IEA, "interchange must end with IEA")
                .at(&last.tag, last.index)
                .expected("IEA", last.tag.as_str()),
        );
    }

    let (gs, ge) = (count(segments, "GS"), count(segments, "GE"));
    if gs != ge {
        report.add_issue(
            ComplianceIssue::error(
                GROUP_MISMATCH,
                format!("mismatched GS/GE segments: {gs} GS vs {ge} GE"),
            )
            .expected(format!("{gs} GE segments"), format!("{ge} GE segments")),
        );
    }
    let (st, se) = (count(segments, "ST"), count(segments, "SE"));
    if st != se {
        report.add_issue(
            ComplianceIssue::error(
                TRANSACTION_MISMATCH,
                format!("mismatched ST/SE segments: {st} ST vs {se} SE"),
            )
            .expected(format!("{st} SE segments"), format!("{se} SE segments")),
        );
    }

    check_transaction_trailers(segments, report);
}

/// SE01 counts and ST02/SE02 control numbers for each closed transaction set.
fn check_transaction_trailers(segments: &[ParsedSegment], report: &mut ComplianceReport) {
    let mut open: Option<&ParsedSegment> = None;
    for segment in segments {
        if segment.is("ST") {
            open = Some(segment);
        } else if segment.is("SE")
            && let Some(st) = open.take()
        {
            let actual = segment.index - st.index + 1;
            let declared = segment.element(1).unwrap_or_default();
            if declared.trim().parse::<usize>().ok() != Some(actual) {
                report.add_issue(
                    ComplianceIssue::error(
                        SEGMENT_COUNT,
                        "SE01 does not match the transaction set segment count",
                    )
                    .at("SE", segment.index)
                    .expected(actual.to_string(), declared),
                );
            }
            let st_control = st.element(2).unwrap_or_default();
            let se_control = segment.element(2).unwrap_or_default();
            if st_control != se_control {
                report.add_issue(
                    ComplianceIssue::error(
                        CONTROL_MISMATCH,
                        "SE02 does not match the ST02 control number",
                    )
                    .at("SE", segment.index)
                    .expected(st_control, se_control),
                );
            }
        }
    }
}

/// ST..SE spans, or the whole input when it has no ST.
fn transactions(segments: &[ParsedSegment]) -> Vec<&[ParsedSegment]> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    for (pos, segment) in segments.iter().enumerate() {
        if segment.is("ST") {
            if let Some(start) = open.replace(pos) {
                spans.push(&segments[start..pos]);
            }
        } else if segment.is("SE")
            && let Some(start) = open.take()
        {
            spans.push(&segments[start..=pos]);
        }
    }
    if let Some(start) = open {
        spans.push(&segments[start..]);
    }
    if spans.is_empty() {
        spans.push(segments);
    }
    spans
}

/// Loop 2300 spans of one transaction: each CLM up to the next CLM.
fn claims(transaction: &[ParsedSegment]) -> Vec<&[ParsedSegment]> {
    let starts: Vec<usize> = transaction
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is("CLM"))
        .map(|(pos, _)| pos)
        .collect();
    starts
        .iter()
        .enumerate()
        .map(|(n, start)| {
            let end = starts.get(n + 1).copied().unwrap_or(transaction.len());
            &transaction[*start..end]
        })
        .collect()
}

fn check_loop_hierarchy(transaction: &[ParsedSegment], report: &mut ComplianceReport) {
    let spans = claims(transaction);
    if spans.is_empty() {
        let mut issue =
            ComplianceIssue::error(MISSING_CLAIM, "no CLM segment found; loop 2300 is required")
                .in_loop("2300");
        if let Some(st) = transaction.first().filter(|s| s.is("ST")) {
            issue = issue.at("ST", st.index);
        }
        report.add_issue(issue);
        return;
    }
    for claim in spans {
        check_location_levels(claim, report);
    }
}

/// Pickup and dropoff belong to either the claim or its service lines.
fn check_location_levels(claim: &[ParsedSegment], report: &mut ComplianceReport) {
    let Some(first_line) = claim.iter().position(|s| s.is("LX")) else {
        return;
    };
    let (claim_level, line_level) = claim.split_at(first_line);
    let locations = [
        ("PW", PICKUP_BOTH_LEVELS, "pickup", "2310E/2420G"),
        ("45", DROPOFF_BOTH_LEVELS, "dropoff", "2310F/2420H"),
    ];
    for (entity, code, label, loops) in locations {
        let find = |span: &[ParsedSegment]| {
            span.iter()
                .find(|s| s.is("NM1") && s.element(1) == Some(entity))
                .map(|s| s.index)
        };
        if let (Some(claim_idx), Some(line_idx)) = (find(claim_level), find(line_level)) {
            report.add_issue(
                ComplianceIssue::warning(
                    code,
                    format!("{label} location (NM1*{entity}) present at both claim and service level"),
                )
                .at("NM1", claim_idx)
                .in_loop(loops)
                .expected(
                    format!("{label} location at one level only"),
                    format!("claim level at {claim_idx}, service level at {line_idx}"),
                ),
            );
        }
    }
}

/// Within each LX span of a claim, K3 must precede the first NM1.
fn check_segment_ordering(claim: &[ParsedSegment], report: &mut ComplianceReport) {
    let starts: Vec<usize> = claim
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is("LX"))
        .map(|(pos, _)| pos)
        .collect();
    for (n, start) in starts.iter().enumerate() {
        let end = starts.get(n + 1).copied().unwrap_or(claim.len());
        let span = &claim[*start..end];
        let first_k3 = span.iter().find(|s| s.is("K3"));
        let first_nm1 = span.iter().find(|s| s.is("NM1"));
        if let (Some(k3), Some(nm1)) = (first_k3, first_nm1)
            && k3.index > nm1.index
        {
            report.add_issue(
                ComplianceIssue::error(
                    K3_AFTER_PROVIDER,
                    "K3 must appear before provider loops (NM1) in loop 2400",
                )
                .at("K3", k3.index)
                .in_loop("2400")
                .expected(
                    format!("K3 before segment {}", nm1.index),
                    format!("K3 at segment {}", k3.index),
                ),
            );
        }
    }
}

/// HCPCS code from an SV101 composite such as `HC:A0130:EH`.
fn procedure_code(segment: &ParsedSegment, component: char) -> Option<&str> {
    segment
        .element(1)?
        .split([component, ' '])
        .filter(|p| !p.is_empty())
        .nth(1)
}

fn check_ambulance_data(segments: &[ParsedSegment], report: &mut ComplianceReport) {
    if !segments.iter().any(|s| s.is("CR1")) {
        report.add_issue(
            ComplianceIssue::warning(
                MISSING_CR1,
                "no CR1 segment found; required for ambulance/NEMT claims",
            )
            .in_loop("2300"),
        );
    }
}

/// Mileage must follow the service it measures, within one claim.
fn check_mileage_adjacency(
    claim: &[ParsedSegment],
    component: char,
    report: &mut ComplianceReport,
) {
    let lines: Vec<(&ParsedSegment, &str)> = claim
        .iter()
        .filter(|s| s.is("SV1"))
        .filter_map(|s| procedure_code(s, component).map(|code| (s, code)))
        .collect();
    for (n, (segment, code)) in lines.iter().enumerate() {
        if !is_mileage_code(code) {
            continue;
        }
        if n == 0 {
            report.add_issue(
                ComplianceIssue::error(
                    MILEAGE_FIRST,
                    format!("mileage code {code} is the first service line"),
                )
                .at("SV1", segment.index)
                .in_loop("2400")
                .expected("service code before mileage code", format!("{code} at line 1")),
            );
        } else if let Some((_, previous)) = lines.get(n - 1)
            && is_mileage_code(previous)
        {
            report.add_issue(
                ComplianceIssue::warning(
                    CONSECUTIVE_MILEAGE,
                    format!("consecutive mileage codes: {previous} followed by {code}"),
                )
                .at("SV1", segment.index)
                .in_loop("2400")
                .expected("service code before mileage code", format!("{previous} -> {code}")),
            );
        }
    }
}
