//! Encoder error types.

use std::fmt;

use nemt_model::Severity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nemt_x12::X12Error;

/// One field-level finding from a claim validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub severity: Severity,
    pub code: String,
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn error(code: &str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.to_string(),
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn warning(code: &str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.to_string(),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.code, self.severity, self.message, self.field
        )
    }
}

/// A claim that must not be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("claim {claim_number} failed validation: {}", join_messages(.issues))]
pub struct ValidationError {
    pub claim_number: String,
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(claim_number: impl Into<String>, issues: Vec<FieldIssue>) -> Self {
        Self {
            claim_number: claim_number.into(),
            issues,
        }
    }

    /// Whether any issue carries `code`.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

fn join_messages(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{} ({})", i.message, i.code))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that stop encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The claim failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Envelope or delimiter problem.
    #[error("X12 envelope error: {0}")]
    Envelope(#[from] X12Error),

    /// Nothing to encode.
    #[error("no claims to encode")]
    NoClaims,
}

/// Result type alias for encoding.
pub type Result<T> = std::result::Result<T, EncodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_messages() {
        let err = ValidationError::new(
            "CLM1",
            vec![
                FieldIssue::error("VAL_001", "billing_provider.npi", "billing provider NPI is required"),
                FieldIssue::error("VAL_040", "services", "at least one service is required"),
            ],
        );
        assert_eq!(
            err.to_string(),
            "claim CLM1 failed validation: billing provider NPI is required (VAL_001); \
             at least one service is required (VAL_040)"
        );
        assert!(err.has_code("VAL_040"));
    }

    #[test]
    fn validation_surfaces_verbatim_through_encode_error() {
        let inner = ValidationError::new(
            "CLM1",
            vec![FieldIssue::error("X", "claim", "custom rule")],
        );
        let message = inner.to_string();
        let err: EncodeError = inner.into();
        assert_eq!(err.to_string(), message);
    }
}
