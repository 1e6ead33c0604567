//! Compliance issues and the compliance report.

use std::fmt;

use nemt_model::Severity;
use serde::Serialize;

/// No segments could be parsed.
pub const PARSE_FAILED: &str = "PARSE_001";
/// First segment is not ISA.
pub const MISSING_ISA: &str = "ENV_001";
/// Last segment is not IEA.
pub const MISSING_IEA: &str = "ENV_002";
/// GS and GE counts differ.
pub const GROUP_MISMATCH: &str = "ENV_003";
/// ST and SE counts differ.
pub const TRANSACTION_MISMATCH: &str = "ENV_004";
/// SE01 does not match the ST..SE segment count.
pub const SEGMENT_COUNT: &str = "ENV_005";
/// ST02 and SE02 differ.
pub const CONTROL_MISMATCH: &str = "ENV_006";
/// No CLM segment.
pub const MISSING_CLAIM: &str = "LOOP_001";
/// Pickup location at both claim and service level.
pub const PICKUP_BOTH_LEVELS: &str = "LOOP_002";
/// Dropoff location at both claim and service level.
pub const DROPOFF_BOTH_LEVELS: &str = "LOOP_003";
/// K3 after a provider loop inside a service line.
pub const K3_AFTER_PROVIDER: &str = "ORDER_001";
/// No CR1 ambulance segment.
pub const MISSING_CR1: &str = "NEMT_001";
/// First service line is mileage.
pub const MILEAGE_FIRST: &str = "NEMT_003";
/// Two mileage lines in a row.
pub const CONSECUTIVE_MILEAGE: &str = "NEMT_004";
/// Unusual NM1 entity identifier.
pub const UNUSUAL_QUALIFIER: &str = "QUAL_001";

/// One structural finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loop_id: Option<String>,
    /// Claim document path, for findings raised before encoding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl ComplianceIssue {
    pub fn new(severity: Severity, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            segment_id: None,
            segment_index: None,
            loop_id: None,
            field: None,
            expected: None,
            actual: None,
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn info(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Attach the offending segment.
    #[must_use]
    pub fn at(mut self, segment_id: &str, index: usize) -> Self {
        self.segment_id = Some(segment_id.to_string());
        self.segment_index = Some(index);
        self
    }

    #[must_use]
    pub fn in_loop(mut self, loop_id: &str) -> Self {
        self.loop_id = Some(loop_id.to_string());
        self
    }

    /// Attach the claim field the finding refers to.
    #[must_use]
    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    #[must_use]
    pub fn expected(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

impl fmt::Display for ComplianceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.severity, self.message)?;
        if let (Some(id), Some(index)) = (&self.segment_id, self.segment_index) {
            write!(f, " (at {id}, segment {index})")?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field {field})")?;
        }
        if let (Some(expected), Some(actual)) = (&self.expected, &self.actual) {
            write!(f, " expected {expected}, found {actual}")?;
        }
        Ok(())
    }
}

/// Result of checking one interchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceReport {
    /// Segments parsed from the input.
    pub segment_count: usize,
    /// ST segments found.
    pub transaction_count: usize,
    issues: Vec<ComplianceIssue>,
}

impl ComplianceReport {
    pub(crate) fn new(segment_count: usize, transaction_count: usize) -> Self {
        Self {
            segment_count,
            transaction_count,
            issues: Vec::new(),
        }
    }

    pub(crate) fn add_issue(&mut self, issue: ComplianceIssue) {
        self.issues.push(issue);
    }

    /// Compliant when no ERROR was found; warnings are allowed.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    #[must_use]
    pub fn issues(&self) -> &[ComplianceIssue] {
        &self.issues
    }

    #[must_use]
    pub fn issues_by_severity(&self, severity: Severity) -> Vec<&ComplianceIssue> {
        self.issues.iter().filter(|i| i.severity == severity).collect()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<&ComplianceIssue> {
        self.issues_by_severity(Severity::Error)
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<&ComplianceIssue> {
        self.issues_by_severity(Severity::Warning)
    }

    /// Whether any issue carries `code`.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.issues_by_severity(Severity::Error).len()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.issues_by_severity(Severity::Warning).len()
    }

    #[must_use]
    pub fn info_count(&self) -> usize {
        self.issues_by_severity(Severity::Info).len()
    }

    /// Generate a summary report.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "=== Compliance Report ===".to_string(),
            format!("Segments: {}", self.segment_count),
            format!("Transaction sets: {}", self.transaction_count),
            String::new(),
            format!(
                "Status: {} ({} errors, {} warnings, {} info)",
                if self.is_compliant() { "COMPLIANT" } else { "NOT COMPLIANT" },
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

impl fmt::Display for ComplianceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
