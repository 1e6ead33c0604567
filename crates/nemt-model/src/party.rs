//! Submitter, receiver, provider and member records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codes::Gender;

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(alias = "addr")]
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    /// Single-line rendering used where an address travels as free text:
    /// `123 Main St, Springfield, IL, 62701`.
    #[must_use]
    pub fn flatten(&self) -> String {
        let mut parts = vec![self.line1.as_str()];
        if let Some(line2) = self.line2.as_deref().filter(|l| !l.is_empty()) {
            parts.push(line2);
        }
        parts.push(self.city.as_str());
        parts.push(self.state.as_str());
        parts.push(self.zip.as_str());
        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Person name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub last: String,
    #[serde(default)]
    pub first: String,
}

/// Loop 1000A submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    pub name: String,
    pub id: String,
    #[serde(default = "default_submitter_qualifier")]
    pub id_qualifier: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

fn default_submitter_qualifier() -> String {
    "46".to_string()
}

impl Default for Submitter {
    fn default() -> Self {
        Self {
            name: String::new(),
            id: String::new(),
            id_qualifier: default_submitter_qualifier(),
            contact_name: None,
            contact_phone: None,
        }
    }
}

/// Loop 1000B receiver, which is also the destination payer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    pub payer_name: String,
    pub payer_id: String,
}

/// Loop 2010AA billing provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingProvider {
    pub npi: String,
    pub name: String,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub taxonomy: Option<String>,
    #[serde(default)]
    pub address: Address,
}

/// Loop 2010BA subscriber, who is always the patient for NEMT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub member_id: String,
    pub name: PersonName,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Gender,
    #[serde(default)]
    pub address: Option<Address>,
}

/// A referenced provider (rendering, referring, supervising, facility).
///
/// Either `npi` or `state_id` identifies the provider; an organization is
/// represented by `organization` with no person name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRef {
    #[serde(default)]
    pub npi: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    /// State Medicaid or atypical provider identifier (REF*G2).
    #[serde(default, alias = "state_medicaid_id", alias = "atypical_id")]
    pub state_id: Option<String>,
    /// Driver's license number (REF*0B).
    #[serde(default)]
    pub driver_license: Option<String>,
    #[serde(default)]
    pub taxonomy: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    /// Entity qualifier override (e.g. `P3` for a primary care referral).
    #[serde(default)]
    pub qualifier: Option<String>,
}

impl ProviderRef {
    /// Provider identified by NPI and person name.
    #[must_use]
    pub fn person(npi: &str, last: &str, first: &str) -> Self {
        Self {
            npi: Some(npi.to_string()),
            last: Some(last.to_string()),
            first: Some(first.to_string()),
            ..Self::default()
        }
    }

    /// NPI with surrounding whitespace removed, if present and non-empty.
    #[must_use]
    pub fn npi(&self) -> Option<&str> {
        self.npi.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Whether the record names a person or an organization.
    #[must_use]
    pub fn has_name(&self) -> bool {
        [&self.last, &self.first, &self.organization]
            .into_iter()
            .any(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
    }

    /// Whether the provider is an organization rather than a person.
    #[must_use]
    pub fn is_organization(&self) -> bool {
        self.organization.is_some() && self.last.is_none()
    }
}

/// Member eligibility grouping carried in the `NTE*ADD` group composite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberGroup {
    pub group_id: String,
    pub sub_group_id: String,
    pub class_id: String,
    pub plan_id: String,
    pub product_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_flattens_with_commas() {
        let address = Address {
            line1: "123 Main St".to_string(),
            line2: None,
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62701".to_string(),
        };
        assert_eq!(address.flatten(), "123 Main St, Springfield, IL, 62701");
    }

    #[test]
    fn provider_npi_ignores_blank() {
        let mut provider = ProviderRef::person(" ", "Brown", "Alice");
        assert_eq!(provider.npi(), None);
        provider.npi = Some("1234567890".to_string());
        assert_eq!(provider.npi(), Some("1234567890"));
        assert!(provider.has_name());
        assert!(!provider.is_organization());
    }

    #[test]
    fn provider_accepts_atypical_alias() {
        let provider: ProviderRef =
            serde_json::from_str(r#"{"last": "Brown", "atypical_id": "ATP123"}"#).unwrap();
        assert_eq!(provider.state_id.as_deref(), Some("ATP123"));
    }
}
