//! Structural compliance checks for X12 837P interchanges.
//!
//! The checker is advisory: it never fails, and every finding is returned in a
//! [`ComplianceReport`]. Delimiters are read from the ISA header when present.
//! Payer business rules run over claim documents in [`payer_rules`].
//!
//! ```
//! let report = nemt_compliance::check("");
//! assert!(!report.is_compliant());
//! assert!(report.has_code(nemt_compliance::report::PARSE_FAILED));
//! ```

pub mod checker;
pub mod parse;
pub mod payer_rules;
pub mod report;

pub use checker::{ComplianceChecker, KNOWN_ENTITY_QUALIFIERS, check};
pub use parse::{ParsedSegment, Separators, parse_segments};
pub use payer_rules::{PayerRuleReport, check_uhc_rules};
pub use report::{ComplianceIssue, ComplianceReport};
