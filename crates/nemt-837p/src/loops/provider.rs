//! Loops 2310A-F and the provider parts of 2420.

use nemt_model::{Address, ProviderRef};
use nemt_x12::Segment;

use crate::error::Result;
use crate::segments::{Nm1, k3, keyed_text, n3, n4, provider_taxonomy, reference, trip_reference};

use super::ClaimWriter;

/// Entity identifier codes for provider loops.
pub(crate) mod entity {
    pub const REFERRING: &str = "DN";
    pub const RENDERING: &str = "82";
    pub const SERVICE_FACILITY: &str = "77";
    pub const SUPERVISING: &str = "DQ";
    pub const PICKUP: &str = "PW";
    pub const DROPOFF: &str = "45";
}

/// NM1 for a provider reference, person or organization.
fn provider_name(entity: &str, provider: &ProviderRef) -> Nm1 {
    let name = if provider.is_organization() {
        Nm1::organization(entity, provider.organization.as_deref().unwrap_or_default())
    } else {
        Nm1::person(
            entity,
            provider.last.as_deref().unwrap_or_default(),
            provider.first.as_deref().unwrap_or_default(),
        )
    };
    name.with_id("XX", provider.npi().unwrap_or_default())
}

/// REF*G2 when the provider has no NPI, REF*0B for a driver's license.
fn provider_references(provider: &ProviderRef) -> Vec<Segment> {
    let mut segments = Vec::new();
    if provider.npi().is_none()
        && let Some(state_id) = provider.state_id.as_deref().filter(|s| !s.trim().is_empty())
    {
        segments.push(reference("G2", state_id.trim()));
    }
    if let Some(license) = provider
        .driver_license
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        segments.push(reference("0B", license.trim()));
    }
    segments
}

/// NM1/N3/N4 for an unnamed transport location.
pub(super) fn location_loop(entity: &str, address: &Address) -> Vec<Segment> {
    vec![
        Nm1::organization(entity, "").build(),
        n3(&address.line1, address.line2.as_deref()),
        n4(&address.city, &address.state, &address.zip),
    ]
}

/// Supervising provider loop (2310D or 2420D) with its trip reference.
pub(super) fn supervising_loop(provider: &ProviderRef, trip_number: Option<u64>) -> Vec<Segment> {
    let mut segments = vec![provider_name(entity::SUPERVISING, provider).build()];
    segments.extend(provider_references(provider));
    if let Some(trip) = trip_number {
        segments.push(reference("LU", &trip_reference(trip)));
    }
    segments
}

/// Rendering provider address carried in K3 extensions.
fn address_extensions(address: &Address) -> Vec<Segment> {
    let street = keyed_text([
        ("AL1", Some(address.line1.clone())),
        ("AL2", address.line2.clone()),
    ]);
    let locality = keyed_text([
        ("CY", Some(address.city.clone())),
        ("ST", Some(address.state.clone())),
        ("ZIP", Some(address.zip.clone())),
    ]);
    street.into_iter().chain(locality).map(|t| k3(&t)).collect()
}

impl ClaimWriter<'_> {
    pub(super) fn write_claim_providers(&mut self) -> Result<()> {
        let claim = self.claim;
        let mut segments = Vec::new();

        if let Some(referring) = &claim.referring_provider {
            let qualifier = referring
                .qualifier
                .as_deref()
                .filter(|q| *q == "P3")
                .unwrap_or(entity::REFERRING);
            segments.push(provider_name(qualifier, referring).build());
            segments.extend(provider_references(referring));
        }

        match &claim.rendering_provider {
            Some(rendering) => {
                segments.push(provider_name(entity::RENDERING, rendering).build());
                if let Some(taxonomy) = rendering.taxonomy.as_deref().filter(|t| !t.is_empty()) {
                    segments.push(provider_taxonomy("PE", taxonomy));
                }
                segments.extend(provider_references(rendering));
                if let Some(address) = &rendering.address {
                    segments.extend(address_extensions(address));
                }
            }
            None => {
                let billing = &claim.billing_provider;
                segments.push(
                    Nm1::organization(entity::RENDERING, &billing.name)
                        .with_id("XX", &billing.npi)
                        .build(),
                );
            }
        }

        if let Some(facility) = &claim.service_facility {
            segments.push(provider_name(entity::SERVICE_FACILITY, facility).build());
            if let Some(address) = &facility.address {
                segments.push(n3(&address.line1, address.line2.as_deref()));
                segments.push(n4(&address.city, &address.state, &address.zip));
            }
            segments.extend(provider_references(facility));
        }

        if let Some(supervising) = &claim.claim.supervising_provider {
            segments.extend(supervising_loop(supervising, claim.claim.trip_number()));
        }

        if !self.inline_locations()
            && let Some(ambulance) = &claim.claim.ambulance
        {
            if let Some(pickup) = &ambulance.pickup {
                segments.extend(location_loop(entity::PICKUP, pickup));
            }
            if let Some(dropoff) = &ambulance.dropoff {
                segments.extend(location_loop(entity::DROPOFF, dropoff));
            }
        }
        self.put_all(segments)
    }
}

#[cfg(test)]
mod tests {
    use nemt_x12::Delimiters;

    use super::*;

    fn rendered(segments: &[Segment]) -> Vec<String> {
        let d = Delimiters::default();
        segments.iter().map(|s| s.render(&d)).collect()
    }

    #[test]
    fn state_id_only_without_npi() {
        let mut provider = ProviderRef {
            last: Some("DRIVER".to_string()),
            first: Some("DAN".to_string()),
            state_id: Some("KY123".to_string()),
            driver_license: Some("D555".to_string()),
            ..ProviderRef::default()
        };
        assert_eq!(
            rendered(&supervising_loop(&provider, Some(42))),
            ["NM1*DQ*1*DRIVER*DAN", "REF*G2*KY123", "REF*0B*D555", "REF*LU*000000042"]
        );
        provider.npi = Some("1234567890".to_string());
        assert_eq!(
            rendered(&supervising_loop(&provider, None)),
            ["NM1*DQ*1*DRIVER*DAN****XX*1234567890", "REF*0B*D555"]
        );
    }

    #[test]
    fn rendering_address_extensions() {
        let address = Address {
            line1: "1 Main St".to_string(),
            line2: None,
            city: "Louisville".to_string(),
            state: "KY".to_string(),
            zip: "40202".to_string(),
        };
        assert_eq!(
            rendered(&address_extensions(&address)),
            ["K3*AL1-1 Main St", "K3*CY-Louisville;ST-KY;ZIP-40202"]
        );
    }
}
