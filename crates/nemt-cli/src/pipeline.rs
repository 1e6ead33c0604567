//! File-level steps shared by the commands.
//!
//! Each step reads or writes one file and hands typed values to the next:
//! claim or trip JSON in, EDI text out, compliance report back.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::{debug, info, info_span};

use nemt_837p::{ClaimEncoder, EncoderConfig};
use nemt_batch::{BatchGrouper, BatchOutcome, TimestampClaimNumbers};
use nemt_compliance::{ComplianceReport, PayerRuleReport, check_uhc_rules};
use nemt_model::{Claim, CommonDefaults, Trip};
use nemt_x12::ControlNumbers;

use crate::config::ToolConfig;
use crate::logging::redact_value;

/// A claim file holds one claim document or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClaimFile {
    One(Box<Claim>),
    Many(Vec<Claim>),
}

/// A trip file is a bare list or an object with `trips` and optional
/// `defaults`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TripFile {
    Bare(Vec<Trip>),
    Wrapped {
        trips: Vec<Trip>,
        #[serde(default)]
        defaults: Option<CommonDefaults>,
    },
}

/// Trips plus any defaults carried in the same file.
#[derive(Debug, Clone)]
pub struct TripBatch {
    pub trips: Vec<Trip>,
    pub defaults: Option<CommonDefaults>,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path, what: &str) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read {what} {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse {what} {}", path.display()))
}

/// Read one or more claim documents.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or holds no claims.
pub fn read_claims(path: &Path) -> Result<Vec<Claim>> {
    let claims = match read_json::<ClaimFile>(path, "claim file")? {
        ClaimFile::One(claim) => vec![*claim],
        ClaimFile::Many(claims) => claims,
    };
    if claims.is_empty() {
        bail!("claim file {} contains no claims", path.display());
    }
    Ok(claims)
}

/// Read a trip batch.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_trips(path: &Path) -> Result<TripBatch> {
    let batch = match read_json::<TripFile>(path, "trip file")? {
        TripFile::Bare(trips) => TripBatch {
            trips,
            defaults: None,
        },
        TripFile::Wrapped { trips, defaults } => TripBatch { trips, defaults },
    };
    debug!(trips = batch.trips.len(), "read trip batch");
    Ok(batch)
}

/// Read batch defaults from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_defaults(path: &Path) -> Result<CommonDefaults> {
    read_json(path, "defaults file")
}

/// Encode claims into one interchange.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or any claim fails
/// validation.
pub fn encode_claims(claims: &[Claim], config: &EncoderConfig) -> Result<String> {
    let span = info_span!("encode_claims", claims = claims.len());
    let _guard = span.enter();
    for claim in claims {
        debug!(
            claim_number = %claim.claim.claim_number,
            member = redact_value(&claim.subscriber.member_id),
            lines = claim.services.len(),
            "queued claim"
        );
    }
    let encoder = ClaimEncoder::new(config.clone()).context("invalid encoder configuration")?;
    let edi = encoder
        .encode_batch(claims, &mut ControlNumbers::new())
        .context("encode claims")?;
    Ok(edi)
}

/// Run the UHC business rules over each claim.
#[must_use]
pub fn check_payer_rules(claims: &[Claim]) -> Vec<PayerRuleReport> {
    claims.iter().map(check_uhc_rules).collect()
}

/// Grouping result and, when the batch succeeded, its interchange.
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub outcome: BatchOutcome,
    pub edi: Option<String>,
}

/// Group trips and encode the resulting claims.
///
/// Claims are only encoded when the batch report has no ERROR.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn run_batch(
    trips: &[Trip],
    defaults: &CommonDefaults,
    config: &ToolConfig,
) -> Result<BatchRun> {
    let numbers =
        TimestampClaimNumbers::from_system_clock(config.batch.claim_number_prefix.clone());
    let outcome = BatchGrouper::new(config.batch.clone(), numbers).group(trips, defaults);
    let edi = if outcome.report.is_success() && !outcome.claims.is_empty() {
        Some(encode_claims(&outcome.claims, &config.encoder)?)
    } else {
        None
    };
    Ok(BatchRun { outcome, edi })
}

/// Run structural checks over an EDI file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn check_file(path: &Path) -> Result<ComplianceReport> {
    let edi =
        fs::read_to_string(path).with_context(|| format!("read EDI file {}", path.display()))?;
    Ok(nemt_compliance::check(&edi))
}

/// Write EDI to `path`, or stdout when none is given or the path is `-`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_output(path: Option<&Path>, edi: &str) -> Result<()> {
    match path.filter(|p| *p != Path::new("-")) {
        Some(path) => {
            fs::write(path, edi).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), bytes = edi.len(), "wrote interchange");
        }
        None => println!("{edi}"),
    }
    Ok(())
}
