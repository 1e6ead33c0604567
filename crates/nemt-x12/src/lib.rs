//! ANSI X12 segment and envelope primitives.
//!
//! This crate knows nothing about claims. It provides the building blocks an
//! X12 encoder needs:
//!
//! - [`Delimiters`] with value escaping (reserved characters are replaced,
//!   never removed)
//! - [`Segment`]/[`Element`] assembly with composite joining and trailing
//!   empty-element trimming
//! - [`ControlNumbers`] for the interchange, group and transaction counters
//! - ISA/GS/ST headers and trailers, with fixed-width ISA padding
//! - [`X12Writer`], which derives SE/GE/IEA counts from the segments it
//!   actually wrote
//!
//! # Example
//!
//! ```
//! use nemt_x12::{Delimiters, Segment};
//!
//! let d = Delimiters::default();
//! let seg = Segment::new("SV1")
//!     .composite(["HC", "T2005", ""])
//!     .element("50.00")
//!     .element("UN")
//!     .element("1");
//! assert_eq!(seg.render(&d), "SV1*HC:T2005*50.00*UN*1");
//! ```

pub mod control;
pub mod delimiters;
pub mod envelope;
mod error;
pub mod format;
pub mod segment;
pub mod writer;

pub use control::{ControlNumbers, MAX_CONTROL_NUMBER};
pub use delimiters::{Delimiters, REPLACEMENT_CHAR};
pub use envelope::{
    GroupHeader, INTERCHANGE_VERSION, InterchangeHeader, UsageIndicator, group_trailer,
    interchange_trailer, transaction_header, transaction_trailer,
};
pub use error::{Result, X12Error};
pub use format::{
    format_amount, format_date, format_quantity, format_short_date, format_time, pad_fixed,
    zero_pad,
};
pub use segment::{Element, Segment, join_composite};
pub use writer::X12Writer;
