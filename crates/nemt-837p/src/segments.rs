//! Tagged builders for the 837P body segments.
//!
//! Each builder names its fields, so element positions live in exactly one
//! place. Builders never see delimiters; rendering escapes values.

use chrono::NaiveDate;

use nemt_x12::{Segment, format_amount, format_date, format_quantity, zero_pad};

/// Width of zero-padded trip references.
pub const TRIP_REFERENCE_WIDTH: usize = 9;

/// Trip reference as written everywhere in the document.
#[must_use]
pub fn trip_reference(trip_number: u64) -> String {
    zero_pad(trip_number, TRIP_REFERENCE_WIDTH)
}

/// NM102 entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Person,
    Organization,
}

impl EntityType {
    const fn code(self) -> &'static str {
        match self {
            Self::Person => "1",
            Self::Organization => "2",
        }
    }
}

/// NM1 individual or organizational name.
#[derive(Debug, Clone)]
pub struct Nm1 {
    pub entity: String,
    pub entity_type: EntityType,
    pub last_or_organization: String,
    pub first: String,
    pub id_qualifier: String,
    pub id: String,
}

impl Nm1 {
    #[must_use]
    pub fn organization(entity: &str, name: &str) -> Self {
        Self {
            entity: entity.to_string(),
            entity_type: EntityType::Organization,
            last_or_organization: name.to_string(),
            first: String::new(),
            id_qualifier: String::new(),
            id: String::new(),
        }
    }

    #[must_use]
    pub fn person(entity: &str, last: &str, first: &str) -> Self {
        Self {
            entity_type: EntityType::Person,
            first: first.to_string(),
            ..Self::organization(entity, last)
        }
    }

    /// Attach NM108/NM109; a blank id leaves both empty.
    #[must_use]
    pub fn with_id(mut self, qualifier: &str, id: &str) -> Self {
        if !id.trim().is_empty() {
            self.id_qualifier = qualifier.to_string();
            self.id = id.trim().to_string();
        }
        self
    }

    #[must_use]
    pub fn build(&self) -> Segment {
        Segment::new("NM1")
            .element(&self.entity)
            .element(self.entity_type.code())
            .element(&self.last_or_organization)
            .element(&self.first)
            .empty(3)
            .element(&self.id_qualifier)
            .element(&self.id)
    }
}

/// N3 street address.
#[must_use]
pub fn n3(line1: &str, line2: Option<&str>) -> Segment {
    Segment::new("N3").element(line1).optional(line2)
}

/// N4 city, state, ZIP.
#[must_use]
pub fn n4(city: &str, state: &str, zip: &str) -> Segment {
    Segment::new("N4").element(city).element(state).element(zip)
}

/// REF reference identification.
#[must_use]
pub fn reference(qualifier: &str, value: &str) -> Segment {
    Segment::new("REF").element(qualifier).element(value)
}

/// PER submitter contact (telephone).
#[must_use]
pub fn contact(name: &str, phone: Option<&str>) -> Segment {
    let segment = Segment::new("PER").element("IC").element(name);
    match phone {
        Some(phone) => segment.element("TE").element(phone),
        None => segment,
    }
}

/// PRV billing/rendering provider taxonomy.
#[must_use]
pub fn provider_taxonomy(code: &str, taxonomy: &str) -> Segment {
    Segment::new("PRV").element(code).element("PXC").element(taxonomy)
}

/// HL hierarchical level.
#[derive(Debug, Clone, Copy)]
pub struct Hl {
    pub id: u32,
    pub parent: Option<u32>,
    pub level: &'static str,
    pub has_children: bool,
}

impl Hl {
    #[must_use]
    pub fn build(&self) -> Segment {
        Segment::new("HL")
            .element(self.id.to_string())
            .optional(self.parent.map(|p| p.to_string()))
            .element(self.level)
            .element(if self.has_children { "1" } else { "0" })
    }
}

/// SBR subscriber information for the primary, self-insured subscriber.
#[must_use]
pub fn subscriber_info() -> Segment {
    Segment::new("SBR").element("P").element("18").empty(6).element("MC")
}

/// DMG demographics.
#[must_use]
pub fn demographics(dob: NaiveDate, sex: &str) -> Segment {
    Segment::new("DMG")
        .element("D8")
        .element(format_date(dob))
        .element(sex)
}

/// BHT beginning of hierarchical transaction.
#[must_use]
pub fn beginning(reference: &str, date: NaiveDate, time: &str) -> Segment {
    Segment::new("BHT")
        .element("0019")
        .element("00")
        .element(reference)
        .element(format_date(date))
        .element(time)
        .element("CH")
}

/// CLM claim information.
#[derive(Debug, Clone)]
pub struct Clm {
    pub claim_number: String,
    pub total_charge: f64,
    pub place_of_service: String,
    pub frequency_code: &'static str,
}

impl Clm {
    #[must_use]
    pub fn build(&self) -> Segment {
        Segment::new("CLM")
            .element(&self.claim_number)
            .element(format_amount(self.total_charge))
            .empty(2)
            .composite([
                self.place_of_service.clone(),
                "B".to_string(),
                self.frequency_code.to_string(),
            ])
            .element("Y")
            .element("A")
            .element("Y")
            .element("Y")
    }
}

/// DTP date or date range.
#[must_use]
pub fn date(qualifier: &str, from: NaiveDate, to: Option<NaiveDate>) -> Segment {
    match to.filter(|to| *to != from) {
        Some(to) => Segment::new("DTP")
            .element(qualifier)
            .element("RD8")
            .element(format!("{}-{}", format_date(from), format_date(to))),
        None => Segment::new("DTP")
            .element(qualifier)
            .element("D8")
            .element(format_date(from)),
    }
}

/// HI diagnoses; the first code is principal (ABK), the rest ABF.
///
/// ICD-10 codes are written without the decimal point.
#[must_use]
pub fn diagnoses<S: AsRef<str>>(codes: &[S]) -> Option<Segment> {
    let mut segment = Segment::new("HI");
    let mut any = false;
    for code in codes.iter().map(|c| c.as_ref().trim().replace('.', "")) {
        if code.is_empty() {
            continue;
        }
        let qualifier = if any { "ABF" } else { "ABK" };
        segment = segment.composite([qualifier.to_string(), code]);
        any = true;
    }
    any.then_some(segment)
}

/// K3 file information.
#[must_use]
pub fn k3(text: &str) -> Segment {
    Segment::new("K3").element(text)
}

/// NTE additional information note.
#[must_use]
pub fn note(text: &str) -> Segment {
    Segment::new("NTE").element("ADD").element(text)
}

/// AMT monetary amount.
#[must_use]
pub fn amount(qualifier: &str, value: f64) -> Segment {
    Segment::new("AMT").element(qualifier).element(format_amount(value))
}

/// CAS adjustment with one reason/amount/quantity triple.
#[must_use]
pub fn adjustment(group: &str, reason: &str, value: f64, quantity: Option<f64>) -> Segment {
    Segment::new("CAS")
        .element(group)
        .element(reason)
        .element(format_amount(value))
        .optional(quantity.map(format_quantity))
}

/// MOA outpatient adjudication remarks (MOA03..MOA07).
#[must_use]
pub fn remarks<S: AsRef<str>>(codes: &[S]) -> Segment {
    codes
        .iter()
        .take(5)
        .fold(Segment::new("MOA").empty(2), |segment, code| {
            segment.element(code.as_ref())
        })
}

/// LQ health care remark code.
#[must_use]
pub fn remark(code: &str) -> Segment {
    Segment::new("LQ").element("HE").element(code)
}

/// CR1 ambulance transport information.
///
/// CR108 carries the zero-padded trip reference; CR109 and CR110 carry the
/// flattened pickup and dropoff addresses when locations are inline.
#[derive(Debug, Clone, Default)]
pub struct Cr1 {
    pub weight_unit: Option<&'static str>,
    pub weight: Option<f64>,
    pub transport_code: Option<String>,
    pub transport_reason: Option<String>,
    pub trip_number: Option<u64>,
    pub pickup: Option<String>,
    pub dropoff: Option<String>,
}

impl Cr1 {
    #[must_use]
    pub fn build(&self) -> Segment {
        let weight = self.weight.map(format_quantity);
        Segment::new("CR1")
            .optional(weight.as_ref().and(self.weight_unit))
            .optional(weight)
            .optional(self.transport_code.as_deref())
            .optional(self.transport_reason.as_deref())
            .empty(3)
            .optional(self.trip_number.map(trip_reference))
            .optional(self.pickup.as_deref())
            .optional(self.dropoff.as_deref())
    }
}

/// LX service line number.
#[must_use]
pub fn line_number(n: usize) -> Segment {
    Segment::new("LX").element(n.to_string())
}

/// SV1 professional service.
#[derive(Debug, Clone)]
pub struct Sv1 {
    pub hcpcs: String,
    pub modifiers: Vec<String>,
    pub charge: f64,
    pub units: f64,
    pub place_of_service: String,
    pub diagnosis_pointer: Option<String>,
    pub emergency: bool,
}

impl Sv1 {
    #[must_use]
    pub fn build(&self) -> Segment {
        let procedure = std::iter::once("HC".to_string())
            .chain(std::iter::once(self.hcpcs.trim().to_ascii_uppercase()))
            .chain(self.modifiers.iter().take(4).map(|m| m.trim().to_string()));
        Segment::new("SV1")
            .composite(procedure)
            .element(format_amount(self.charge))
            .element("UN")
            .element(format_quantity(self.units))
            .element(&self.place_of_service)
            .empty(1)
            .optional(self.diagnosis_pointer.as_deref())
            .empty(1)
            .optional(self.emergency.then_some("Y"))
    }
}

/// SVD line adjudication.
#[derive(Debug, Clone)]
pub struct Svd {
    pub payer_id: String,
    pub paid_amount: f64,
    pub hcpcs: String,
    pub modifiers: Vec<String>,
    pub paid_units: Option<f64>,
}

impl Svd {
    #[must_use]
    pub fn build(&self) -> Segment {
        let procedure = ["HC".to_string(), self.hcpcs.trim().to_ascii_uppercase()]
            .into_iter()
            .chain(self.modifiers.iter().take(4).map(|m| m.trim().to_string()));
        Segment::new("SVD")
            .element(&self.payer_id)
            .element(format_amount(self.paid_amount))
            .composite(procedure)
            .empty(1)
            .optional(self.paid_units.map(format_quantity))
    }
}

/// Semicolon-joined `KEY-value` pairs, skipping absent values.
#[must_use]
pub fn keyed_text<'a, I>(pairs: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, Option<String>)>,
{
    let parts: Vec<String> = pairs
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| format!("{key}-{v}"))
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join(";"))
}
