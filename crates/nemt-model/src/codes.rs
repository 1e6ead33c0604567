//! Code values used by NEMT claims.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Place of service used when neither the claim nor the line names one
/// (ambulance, land).
pub const DEFAULT_PLACE_OF_SERVICE: &str = "41";

/// Mileage HCPCS codes. A mileage line must directly follow the service line
/// it measures.
pub const MILEAGE_CODES: &[&str] = &[
    "A0021", "A0080", "A0090", "A0160", "A0200", "A0380", "A0382", "A0390", "A0394", "A0425",
    "A0435", "A0436", "T2049",
];

/// Whether `hcpcs` is billed per mile.
#[must_use]
pub fn is_mileage_code(hcpcs: &str) -> bool {
    MILEAGE_CODES.contains(&hcpcs.trim().to_ascii_uppercase().as_str())
}

/// Place-of-service codes accepted for NEMT claims.
pub const PLACE_OF_SERVICE_CODES: &[(&str, &str)] = &[
    ("02", "Telehealth"),
    ("11", "Office"),
    ("12", "Home"),
    ("21", "Inpatient Hospital"),
    ("22", "On Campus-Outpatient Hospital"),
    ("23", "Emergency Room - Hospital"),
    ("31", "Skilled Nursing Facility"),
    ("32", "Nursing Facility"),
    ("33", "Custodial Care Facility"),
    ("41", "Ambulance - Land"),
    ("42", "Ambulance - Air or Water"),
    ("49", "Independent Clinic"),
    ("50", "Federally Qualified Health Center"),
    ("65", "End-Stage Renal Disease Treatment Facility"),
    ("71", "Public Health Clinic"),
    ("72", "Rural Health Clinic"),
    ("81", "Independent Laboratory"),
    ("99", "Other Place of Service"),
];

/// Whether `code` is a known place of service.
#[must_use]
pub fn is_place_of_service(code: &str) -> bool {
    PLACE_OF_SERVICE_CODES.iter().any(|(c, _)| *c == code)
}

/// US state and territory abbreviations.
pub const STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY", "DC", "PR", "VI", "GU", "AS", "MP",
];

/// Ambulance transport codes (CR1 transport code position).
pub const TRANSPORT_CODES: &[&str] = &["A", "B", "C", "D", "E"];

/// Ambulance transport reason codes.
pub const TRANSPORT_REASON_CODES: &[&str] = &["A", "B", "C", "D", "DH", "E"];

/// Claim frequency code (CLM05-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrequencyCode {
    /// Original claim.
    #[default]
    #[serde(rename = "1")]
    Original,
    /// Corrected claim.
    #[serde(rename = "6")]
    Corrected,
    /// Replacement of a prior claim.
    #[serde(rename = "7")]
    Replacement,
    /// Void/cancel of a prior claim.
    #[serde(rename = "8")]
    Void,
}

impl FrequencyCode {
    /// Single-digit code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Original => "1",
            Self::Corrected => "6",
            Self::Replacement => "7",
            Self::Void => "8",
        }
    }

    /// Replacement and void must reference the claim they act on.
    #[must_use]
    pub const fn requires_original_reference(self) -> bool {
        matches!(self, Self::Replacement | Self::Void)
    }
}

impl fmt::Display for FrequencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FrequencyCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Original),
            "6" => Ok(Self::Corrected),
            "7" => Ok(Self::Replacement),
            "8" => Ok(Self::Void),
            other => Err(ModelError::InvalidCode {
                kind: "frequency",
                value: other.to_string(),
            }),
        }
    }
}

/// Adjustment intent, used when no explicit frequency code is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentType {
    Replacement,
    Void,
}

/// Claim or line payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "P", alias = "paid")]
    Paid,
    #[serde(rename = "D", alias = "denied")]
    Denied,
}

impl PaymentStatus {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Paid => "P",
            Self::Denied => "D",
        }
    }
}

/// How the trip was originally submitted to the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubmissionChannel {
    Electronic,
    Paper,
}

impl SubmissionChannel {
    /// Value carried in the `TRPN-` extension.
    #[must_use]
    pub const fn transmission_code(self) -> &'static str {
        match self {
            Self::Electronic => "ASPUFEELEC",
            Self::Paper => "ASPUFEPAPER",
        }
    }
}

impl fmt::Display for SubmissionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Electronic => f.write_str("ELECTRONIC"),
            Self::Paper => f.write_str("PAPER"),
        }
    }
}

/// Rendering provider network participation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkIndicator {
    #[serde(rename = "I")]
    InNetwork,
    #[serde(rename = "O")]
    OutOfNetwork,
}

impl NetworkIndicator {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InNetwork => "I",
            Self::OutOfNetwork => "O",
        }
    }
}

/// Administrative sex (DMG03).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
    #[default]
    #[serde(rename = "U")]
    Unknown,
}

impl Gender {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Female => "F",
            Self::Male => "M",
            Self::Unknown => "U",
        }
    }
}

/// Patient weight unit (CR101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "LB")]
    Pounds,
    #[serde(rename = "KG")]
    Kilograms,
}

impl WeightUnit {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pounds => "LB",
            Self::Kilograms => "KG",
        }
    }
}
