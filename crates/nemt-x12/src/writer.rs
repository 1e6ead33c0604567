//! Envelope-aware segment writer.
//!
//! [`X12Writer`] renders segments into a buffer and tracks which envelope
//! levels are open, so trailer counts (SE01, GE01, IEA01) are always derived
//! from what was actually written.

use tracing::trace;

use crate::delimiters::Delimiters;
use crate::envelope::{
    GroupHeader, InterchangeHeader, group_trailer, interchange_trailer, transaction_header,
    transaction_trailer,
};
use crate::error::{Result, X12Error};
use crate::segment::Segment;

#[derive(Debug)]
struct OpenInterchange {
    control_number: u32,
    groups: usize,
}

#[derive(Debug)]
struct OpenGroup {
    control_number: u32,
    transactions: usize,
}

#[derive(Debug)]
struct OpenTransaction {
    control_number: u32,
    segments: usize,
}

/// Writes segments into an X12 interchange.
#[derive(Debug)]
pub struct X12Writer {
    delimiters: Delimiters,
    line_breaks: bool,
    buffer: String,
    total_segments: usize,
    interchange: Option<OpenInterchange>,
    group: Option<OpenGroup>,
    transaction: Option<OpenTransaction>,
}

impl X12Writer {
    /// Create a writer using the given delimiters.
    pub fn new(delimiters: Delimiters) -> Result<Self> {
        delimiters.validate()?;
        Ok(Self {
            delimiters,
            line_breaks: false,
            buffer: String::new(),
            total_segments: 0,
            interchange: None,
            group: None,
            transaction: None,
        })
    }

    /// Emit a newline after every segment terminator.
    #[must_use]
    pub fn with_line_breaks(mut self, enable: bool) -> Self {
        self.line_breaks = enable;
        self
    }

    /// Active delimiters.
    #[must_use]
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Open the interchange with an ISA header.
    pub fn begin_interchange(&mut self, header: &InterchangeHeader) -> Result<()> {
        if self.interchange.is_some() || self.total_segments > 0 {
            return Err(X12Error::envelope_order("ISA must be the first segment"));
        }
        let isa = header.to_segment(&self.delimiters)?;
        self.push(&isa);
        self.interchange = Some(OpenInterchange {
            control_number: header.control_number,
            groups: 0,
        });
        Ok(())
    }

    /// Open a functional group with a GS header.
    pub fn begin_group(&mut self, header: &GroupHeader) -> Result<()> {
        if self.interchange.is_none() {
            return Err(X12Error::envelope_order("GS outside of an interchange"));
        }
        if self.group.is_some() {
            return Err(X12Error::envelope_order("GS while a group is already open"));
        }
        self.push(&header.to_segment());
        self.group = Some(OpenGroup {
            control_number: header.control_number,
            transactions: 0,
        });
        Ok(())
    }

    /// Open a transaction set with an ST header.
    pub fn begin_transaction(
        &mut self,
        set_id: &str,
        control_number: u32,
        version: &str,
    ) -> Result<()> {
        if self.group.is_none() {
            return Err(X12Error::envelope_order("ST outside of a functional group"));
        }
        if self.transaction.is_some() {
            return Err(X12Error::envelope_order(
                "ST while a transaction set is already open",
            ));
        }
        self.transaction = Some(OpenTransaction {
            control_number,
            segments: 0,
        });
        self.write(&transaction_header(set_id, control_number, version))
    }

    /// Write a body segment inside the open transaction set.
    pub fn write(&mut self, segment: &Segment) -> Result<()> {
        let Some(transaction) = self.transaction.as_mut() else {
            return Err(X12Error::envelope_order(format!(
                "{} outside of a transaction set",
                segment.tag()
            )));
        };
        transaction.segments += 1;
        self.push(segment);
        Ok(())
    }

    /// Segments written since the open ST, inclusive.
    #[must_use]
    pub fn transaction_segment_count(&self) -> Option<usize> {
        self.transaction.as_ref().map(|t| t.segments)
    }

    /// Close the transaction set with SE and return its segment count.
    pub fn end_transaction(&mut self) -> Result<usize> {
        let Some(transaction) = self.transaction.take() else {
            return Err(X12Error::envelope_order("SE without an open transaction set"));
        };
        let count = transaction.segments + 1;
        self.push(&transaction_trailer(count, transaction.control_number));
        if let Some(group) = self.group.as_mut() {
            group.transactions += 1;
        }
        trace!(
            control_number = transaction.control_number,
            count,
            "closed transaction set"
        );
        Ok(count)
    }

    /// Close the functional group with GE.
    pub fn end_group(&mut self) -> Result<()> {
        if self.transaction.is_some() {
            return Err(X12Error::Unterminated { level: "ST" });
        }
        let Some(group) = self.group.take() else {
            return Err(X12Error::envelope_order("GE without an open group"));
        };
        self.push(&group_trailer(group.transactions, group.control_number));
        if let Some(interchange) = self.interchange.as_mut() {
            interchange.groups += 1;
        }
        Ok(())
    }

    /// Close the interchange with IEA.
    pub fn end_interchange(&mut self) -> Result<()> {
        if self.group.is_some() {
            return Err(X12Error::Unterminated { level: "GS" });
        }
        let Some(interchange) = self.interchange.take() else {
            return Err(X12Error::envelope_order("IEA without an open interchange"));
        };
        self.push(&interchange_trailer(
            interchange.groups,
            interchange.control_number,
        ));
        Ok(())
    }

    /// Finish and return the rendered interchange.
    pub fn finish(self) -> Result<String> {
        if self.transaction.is_some() {
            return Err(X12Error::Unterminated { level: "ST" });
        }
        if self.group.is_some() {
            return Err(X12Error::Unterminated { level: "GS" });
        }
        if self.interchange.is_some() {
            return Err(X12Error::Unterminated { level: "ISA" });
        }
        Ok(self.buffer)
    }

    fn push(&mut self, segment: &Segment) {
        self.buffer.push_str(&segment.render(&self.delimiters));
        self.buffer.push(self.delimiters.segment);
        if self.line_breaks {
            self.buffer.push('\n');
        }
        self.total_segments += 1;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn open(writer: &mut X12Writer) {
        let stamp = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        writer
            .begin_interchange(&InterchangeHeader::new(
                ("ZZ", "SENDER"),
                ("ZZ", "RECEIVER"),
                stamp,
                1,
            ))
            .unwrap();
        writer
            .begin_group(&GroupHeader {
                functional_id: "HC".to_string(),
                application_sender: "SENDER".to_string(),
                application_receiver: "RECEIVER".to_string(),
                timestamp: stamp,
                control_number: 1,
                version: "005010X222A1".to_string(),
            })
            .unwrap();
    }

    #[test]
    fn test_se_count_includes_st_and_se() {
        let mut writer = X12Writer::new(Delimiters::default()).unwrap();
        open(&mut writer);
        writer.begin_transaction("837", 1, "005010X222A1").unwrap();
        writer.write(&Segment::new("BHT").element("0019")).unwrap();
        writer.write(&Segment::new("LX").element("1")).unwrap();
        assert_eq!(writer.transaction_segment_count(), Some(3));
        assert_eq!(writer.end_transaction().unwrap(), 4);
        writer.end_group().unwrap();
        writer.end_interchange().unwrap();
        let text = writer.finish().unwrap();
        assert!(text.contains("SE*4*0001~"));
        assert!(text.contains("GE*1*1~"));
        assert!(text.ends_with("IEA*1*000000001~"));
    }

    #[test]
    fn test_rejects_body_segment_outside_transaction() {
        let mut writer = X12Writer::new(Delimiters::default()).unwrap();
        open(&mut writer);
        assert!(writer.write(&Segment::new("CLM")).is_err());
    }

    #[test]
    fn test_finish_with_open_group_fails() {
        let mut writer = X12Writer::new(Delimiters::default()).unwrap();
        open(&mut writer);
        assert!(matches!(
            writer.finish(),
            Err(X12Error::Unterminated { level: "GS" })
        ));
    }

    #[test]
    fn test_line_breaks() {
        let mut writer = X12Writer::new(Delimiters::default())
            .unwrap()
            .with_line_breaks(true);
        open(&mut writer);
        writer.begin_transaction("837", 9, "005010X222A1").unwrap();
        writer.end_transaction().unwrap();
        writer.end_group().unwrap();
        writer.end_interchange().unwrap();
        let text = writer.finish().unwrap();
        assert_eq!(text.lines().count(), 6);
    }
}
