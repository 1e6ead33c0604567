//! Batch issues and the batch report.

use std::fmt;

use nemt_model::Severity;
use serde::{Deserialize, Serialize};

/// Empty trip list.
pub const EMPTY_BATCH: &str = "BATCH_001";
/// Trip without a date of service.
pub const MISSING_DOS: &str = "BATCH_002";
/// Trip without a member.
pub const MISSING_MEMBER: &str = "BATCH_003";
/// Trip without a service.
pub const MISSING_SERVICE: &str = "BATCH_004";
/// Trip service without an HCPCS code.
pub const MISSING_HCPCS: &str = "BATCH_005";
/// Two claims share claim number, frequency and original reference.
pub const DUPLICATE_CLAIM: &str = "BATCH_010";
/// A claim starts with a mileage line.
pub const MILEAGE_FIRST: &str = "BATCH_011";
/// Two mileage lines in a row.
pub const CONSECUTIVE_MILEAGE: &str = "BATCH_012";
/// Several trips were folded into one claim.
pub const TRIPS_GROUPED: &str = "BATCH_100";
/// Mileage correctly follows its service line.
pub const MILEAGE_PAIRED: &str = "BATCH_101";

/// A single finding produced while grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchIssue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    /// Zero-based index into the input trip list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl BatchIssue {
    pub fn new(severity: Severity, code: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.to_string(),
            message: message.into(),
            trip_index: None,
            claim_number: None,
            field: None,
        }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn info(code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    #[must_use]
    pub fn at_trip(mut self, index: usize) -> Self {
        self.trip_index = Some(index);
        self
    }

    #[must_use]
    pub fn for_claim(mut self, claim_number: impl Into<String>) -> Self {
        self.claim_number = Some(claim_number.into());
        self
    }

    #[must_use]
    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for BatchIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.severity, self.message)?;
        let mut location = Vec::new();
        if let Some(index) = self.trip_index {
            location.push(format!("trip {index}"));
        }
        if let Some(claim) = &self.claim_number {
            location.push(format!("claim {claim}"));
        }
        if let Some(field) = &self.field {
            location.push(format!("field {field}"));
        }
        if !location.is_empty() {
            write!(f, " (at {})", location.join(", "))?;
        }
        Ok(())
    }
}

/// Outcome of one grouping call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub trips_processed: usize,
    pub claims_generated: usize,
    issues: Vec<BatchIssue>,
}

impl BatchReport {
    pub(crate) fn new(trips_processed: usize) -> Self {
        Self {
            trips_processed,
            claims_generated: 0,
            issues: Vec::new(),
        }
    }

    pub(crate) fn add_issue(&mut self, issue: BatchIssue) {
        self.issues.push(issue);
    }

    /// The batch succeeded when no ERROR was recorded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    #[must_use]
    pub fn issues(&self) -> &[BatchIssue] {
        &self.issues
    }

    /// Issues carrying a given code.
    #[must_use]
    pub fn issues_with_code(&self, code: &str) -> Vec<&BatchIssue> {
        self.issues.iter().filter(|i| i.code == code).collect()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    #[must_use]
    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Generate a summary report.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "=== Batch Report ===".to_string(),
            format!("Trips processed: {}", self.trips_processed),
            format!("Claims generated: {}", self.claims_generated),
            String::new(),
            format!(
                "Status: {} ({} errors, {} warnings, {} info)",
                if self.is_success() { "SUCCESS" } else { "FAILED" },
                self.error_count(),
                self.warning_count(),
                self.info_count()
            ),
        ];
        if !self.issues.is_empty() {
            lines.push(String::new());
            lines.push("Issues:".to_string());
            for issue in &self.issues {
                lines.push(format!("  {issue}"));
            }
        }
        lines.join("\n")
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
