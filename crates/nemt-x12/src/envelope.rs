//! ISA/IEA, GS/GE and ST/SE envelope segments.
//!
//! The interchange header is the only fixed-width segment in X12: ISA01
//! through ISA16 occupy exact widths so the header is always 106 characters
//! including its terminator. Every padded field is validated rather than
//! truncated.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::delimiters::Delimiters;
use crate::error::Result;
use crate::format::{format_date, format_short_date, format_time, pad_fixed, zero_pad};
use crate::segment::Segment;

/// Interchange control version number (ISA12).
pub const INTERCHANGE_VERSION: &str = "00501";

/// ISA usage indicator (ISA15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UsageIndicator {
    /// Test data.
    #[default]
    #[serde(rename = "T", alias = "test")]
    Test,
    /// Production data.
    #[serde(rename = "P", alias = "production")]
    Production,
}

impl UsageIndicator {
    /// Single-character code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Test => "T",
            Self::Production => "P",
        }
    }
}

impl fmt::Display for UsageIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Values for the ISA interchange header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterchangeHeader {
    pub authorization_qualifier: String,
    pub authorization: String,
    pub security_qualifier: String,
    pub security: String,
    pub sender_qualifier: String,
    pub sender_id: String,
    pub receiver_qualifier: String,
    pub receiver_id: String,
    pub timestamp: NaiveDateTime,
    pub control_number: u32,
    pub acknowledgment_requested: bool,
    pub usage: UsageIndicator,
}

impl InterchangeHeader {
    /// Header with blank authorization/security information.
    #[must_use]
    pub fn new(
        sender: (&str, &str),
        receiver: (&str, &str),
        timestamp: NaiveDateTime,
        control_number: u32,
    ) -> Self {
        Self {
            authorization_qualifier: "00".to_string(),
            authorization: String::new(),
            security_qualifier: "00".to_string(),
            security: String::new(),
            sender_qualifier: sender.0.to_string(),
            sender_id: sender.1.to_string(),
            receiver_qualifier: receiver.0.to_string(),
            receiver_id: receiver.1.to_string(),
            timestamp,
            control_number,
            acknowledgment_requested: false,
            usage: UsageIndicator::default(),
        }
    }

    /// Set the usage indicator.
    #[must_use]
    pub fn with_usage(mut self, usage: UsageIndicator) -> Self {
        self.usage = usage;
        self
    }

    /// Request a TA1 interchange acknowledgment.
    #[must_use]
    pub fn with_acknowledgment(mut self, requested: bool) -> Self {
        self.acknowledgment_requested = requested;
        self
    }

    /// Build the fixed-width ISA segment.
    ///
    /// Padded fields are written verbatim, so a value that is too wide or
    /// carries a separator is an error.
    pub fn to_segment(&self, delimiters: &Delimiters) -> Result<Segment> {
        let fixed = |field: &'static str, value: &str, width: usize| -> Result<String> {
            delimiters.check_raw(field, value)?;
            pad_fixed(field, value, width)
        };
        let date = self.timestamp.date();
        let time = self.timestamp.time();
        Ok(Segment::new("ISA")
            .raw(fixed("ISA01", &self.authorization_qualifier, 2)?)
            .raw(fixed("ISA02", &self.authorization, 10)?)
            .raw(fixed("ISA03", &self.security_qualifier, 2)?)
            .raw(fixed("ISA04", &self.security, 10)?)
            .raw(fixed("ISA05", &self.sender_qualifier, 2)?)
            .raw(fixed("ISA06", &self.sender_id, 15)?)
            .raw(fixed("ISA07", &self.receiver_qualifier, 2)?)
            .raw(fixed("ISA08", &self.receiver_id, 15)?)
            .raw(format_short_date(date))
            .raw(format_time(time))
            .raw(delimiters.repetition.to_string())
            .raw(INTERCHANGE_VERSION)
            .raw(zero_pad(u64::from(self.control_number), 9))
            .raw(if self.acknowledgment_requested { "1" } else { "0" })
            .raw(self.usage.code())
            .raw(delimiters.component.to_string()))
    }
}

/// IEA trailer.
#[must_use]
pub fn interchange_trailer(group_count: usize, control_number: u32) -> Segment {
    Segment::new("IEA")
        .element(group_count.to_string())
        .element(zero_pad(u64::from(control_number), 9))
}

/// Values for the GS functional group header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHeader {
    pub functional_id: String,
    pub application_sender: String,
    pub application_receiver: String,
    pub timestamp: NaiveDateTime,
    pub control_number: u32,
    pub version: String,
}

impl GroupHeader {
    /// Build the GS segment.
    #[must_use]
    pub fn to_segment(&self) -> Segment {
        Segment::new("GS")
            .element(&self.functional_id)
            .element(&self.application_sender)
            .element(&self.application_receiver)
            .element(format_date(self.timestamp.date()))
            .element(format_time(self.timestamp.time()))
            .element(self.control_number.to_string())
            .element("X")
            .element(&self.version)
    }
}

/// GE trailer.
#[must_use]
pub fn group_trailer(transaction_count: usize, control_number: u32) -> Segment {
    Segment::new("GE")
        .element(transaction_count.to_string())
        .element(control_number.to_string())
}

/// Zero-padded ST02/SE02 form of a transaction control number.
#[must_use]
pub fn transaction_control(control_number: u32) -> String {
    zero_pad(u64::from(control_number), 4)
}

/// ST header.
#[must_use]
pub fn transaction_header(set_id: &str, control_number: u32, version: &str) -> Segment {
    Segment::new("ST")
        .element(set_id)
        .element(transaction_control(control_number))
        .element(version)
}

/// SE trailer; `segment_count` includes both ST and SE.
#[must_use]
pub fn transaction_trailer(segment_count: usize, control_number: u32) -> Segment {
    Segment::new("SE")
        .element(segment_count.to_string())
        .element(transaction_control(control_number))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::X12Error;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap()
    }

    #[test]
    fn test_isa_fixed_width() {
        let d = Delimiters::default();
        let header = InterchangeHeader::new(("ZZ", "SUBMITTER1"), ("ZZ", "87726"), stamp(), 7);
        let rendered = header.to_segment(&d).unwrap().render(&d);
        assert_eq!(
            rendered,
            "ISA*00*          *00*          *ZZ*SUBMITTER1     *ZZ*87726          \
             *260102*1345*^*00501*000000007*0*T*:"
        );
        // 105 characters plus terminator
        assert_eq!(rendered.len(), 105);
    }

    #[test]
    fn test_isa_rejects_long_ids() {
        let d = Delimiters::default();
        let header =
            InterchangeHeader::new(("ZZ", "THIS-ID-IS-TOO-LONG"), ("ZZ", "87726"), stamp(), 1);
        assert!(header.to_segment(&d).is_err());
    }

    #[test]
    fn test_isa_rejects_separators_in_ids() {
        let d = Delimiters::default();
        let header = InterchangeHeader::new(("ZZ", "SUB~MITTER"), ("ZZ", "87726"), stamp(), 1);
        assert!(matches!(
            header.to_segment(&d),
            Err(X12Error::ReservedCharacter {
                field: "ISA06",
                character: '~',
                ..
            })
        ));

        let header = InterchangeHeader::new(("ZZ", "SUBMITTER1"), ("Z:", "87726"), stamp(), 1);
        assert!(matches!(
            header.to_segment(&d),
            Err(X12Error::ReservedCharacter { field: "ISA07", .. })
        ));
    }

    #[test]
    fn test_group_and_transaction_segments() {
        let d = Delimiters::default();
        let gs = GroupHeader {
            functional_id: "HC".to_string(),
            application_sender: "SENDER".to_string(),
            application_receiver: "RECEIVER".to_string(),
            timestamp: stamp(),
            control_number: 3,
            version: "005010X222A1".to_string(),
        };
        assert_eq!(
            gs.to_segment().render(&d),
            "GS*HC*SENDER*RECEIVER*20260102*1345*3*X*005010X222A1"
        );
        assert_eq!(group_trailer(1, 3).render(&d), "GE*1*3");
        assert_eq!(
            transaction_header("837", 1, "005010X222A1").render(&d),
            "ST*837*0001*005010X222A1"
        );
        assert_eq!(transaction_trailer(42, 1).render(&d), "SE*42*0001");
        assert_eq!(interchange_trailer(1, 7).render(&d), "IEA*1*000000007");
    }
}
