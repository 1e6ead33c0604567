//! Predefined payer profiles.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Payer identity used for loop 2010BB and the default receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerProfile {
    pub payer_id: String,
    pub payer_name: String,
    /// NM108 identification code qualifier (`PI` payer id, `46` ETIN).
    #[serde(default = "default_qualifier")]
    pub qualifier: String,
}

fn default_qualifier() -> String {
    "PI".to_string()
}

impl PayerProfile {
    /// Custom payer with the standard `PI` qualifier.
    #[must_use]
    pub fn custom(payer_id: impl Into<String>, payer_name: impl Into<String>) -> Self {
        Self {
            payer_id: payer_id.into(),
            payer_name: payer_name.into(),
            qualifier: default_qualifier(),
        }
    }

    /// Look up a predefined profile by key (case-insensitive).
    pub fn by_key(key: &str) -> Result<Self> {
        let wanted = key.trim().to_ascii_uppercase();
        PAYER_PROFILES
            .iter()
            .find(|(k, ..)| *k == wanted)
            .map(|(_, id, name, qualifier)| Self {
                payer_id: (*id).to_string(),
                payer_name: (*name).to_string(),
                qualifier: (*qualifier).to_string(),
            })
            .ok_or(ModelError::UnknownPayer { key: key.to_string() })
    }
}

/// Known payers as `(key, payer id, payer name, qualifier)`.
pub const PAYER_PROFILES: &[(&str, &str, &str, &str)] = &[
    ("UHC_CS", "87726", "UNITED HEALTHCARE COMMUNITY & STATE", "PI"),
    ("UHC_KY", "87726", "UNITED HEALTHCARE KENTUCKY", "PI"),
    ("AVAILITY", "030240928", "AVAILITY", "46"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let payer = PayerProfile::by_key("uhc_cs").unwrap();
        assert_eq!(payer.payer_id, "87726");
        assert_eq!(payer.qualifier, "PI");
        let availity = PayerProfile::by_key("AVAILITY").unwrap();
        assert_eq!(availity.qualifier, "46");
    }

    #[test]
    fn unknown_key_fails() {
        let err = PayerProfile::by_key("ACME").unwrap_err();
        assert_eq!(err.to_string(), "unknown payer profile: ACME");
    }
}
