use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use nemt_837p::LocationMode;
use nemt_batch::BatchOutcome;
use nemt_cli::config::{EncoderOverrides, ToolConfig};
use nemt_cli::pipeline::{
    check_file, check_payer_rules, encode_claims, read_claims, read_defaults, read_trips,
    run_batch, write_output,
};
use nemt_compliance::{ComplianceReport, PayerRuleReport};
use nemt_x12::UsageIndicator;

use crate::cli::{BatchArgs, CheckArgs, EncodeArgs, EnvelopeArgs, LocationModeArg, UsageArg};

/// What `encode` produced.
pub struct EncodeResult {
    pub claims: usize,
    pub compliance: Option<ComplianceReport>,
    pub payer_rules: Vec<PayerRuleReport>,
}

fn overrides(args: &EnvelopeArgs) -> EncoderOverrides {
    EncoderOverrides {
        sender_qualifier: args.sender_qualifier.clone(),
        sender_id: args.sender_id.clone(),
        receiver_qualifier: args.receiver_qualifier.clone(),
        receiver_id: args.receiver_id.clone(),
        application_sender: args.gs_sender.clone(),
        application_receiver: args.gs_receiver.clone(),
        usage: args.usage.map(|usage| match usage {
            UsageArg::Test => UsageIndicator::Test,
            UsageArg::Production => UsageIndicator::Production,
        }),
        payer: args.payer.clone(),
        location_mode: args.location_mode.map(|mode| match mode {
            LocationModeArg::Inline => LocationMode::Inline,
            LocationModeArg::Separate => LocationMode::SeparateLoops,
        }),
    }
}

fn load_config(args: &EnvelopeArgs) -> Result<ToolConfig> {
    let mut config = ToolConfig::load(args.config.as_deref())?;
    config.encoder = overrides(args).apply(config.encoder)?;
    Ok(config)
}

pub fn run_encode(args: &EncodeArgs) -> Result<EncodeResult> {
    let span = info_span!("encode", input = %args.claim.display());
    let _guard = span.enter();
    let config = load_config(&args.envelope)?;
    let claims = read_claims(&args.claim)?;
    let payer_rules = if args.uhc_rules {
        check_payer_rules(&claims)
    } else {
        Vec::new()
    };
    let edi = encode_claims(&claims, &config.encoder)?;
    write_output(args.envelope.out.as_deref(), &edi)?;
    info!(claims = claims.len(), "encode complete");
    let compliance = args.check.then(|| nemt_compliance::check(&edi));
    Ok(EncodeResult {
        claims: claims.len(),
        compliance,
        payer_rules,
    })
}

pub fn run_batch_command(args: &BatchArgs) -> Result<BatchOutcome> {
    let span = info_span!("batch", input = %args.trips.display());
    let _guard = span.enter();
    let config = load_config(&args.envelope)?;
    let batch = read_trips(&args.trips)?;
    let defaults = match &args.defaults {
        Some(path) => read_defaults(path)?,
        None => batch.defaults.clone().unwrap_or_else(|| config.defaults.clone()),
    };
    let run = run_batch(&batch.trips, &defaults, &config)?;
    match &run.edi {
        Some(edi) => write_output(args.envelope.out.as_deref(), edi)?,
        None => warn!(
            errors = run.outcome.report.error_count(),
            "batch has errors; no interchange written"
        ),
    }
    Ok(run.outcome)
}

pub fn run_check(args: &CheckArgs) -> Result<ComplianceReport> {
    let span = info_span!("check", input = %args.edi.display());
    let _guard = span.enter();
    check_file(&args.edi)
}

pub fn print_json(report: &ComplianceReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize compliance report")?;
    println!("{json}");
    Ok(())
}
