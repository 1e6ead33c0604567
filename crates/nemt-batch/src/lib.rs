//! Batch grouping of NEMT trip legs into claims.
//!
//! [`BatchGrouper::group`] validates required trip fields, groups trips by
//! (date of service, member, rendering NPI, billing NPI) in first-appearance
//! order, sums charges, assigns claim numbers, and reports duplicates and
//! mileage adjacency problems in a [`BatchReport`].

pub mod config;
pub mod grouper;
pub mod numbering;
pub mod report;

pub use config::BatchConfig;
pub use grouper::{BatchGrouper, BatchOutcome, GroupKey, group_trips};
pub use numbering::{ClaimNumberSource, TimestampClaimNumbers};
pub use report::{BatchIssue, BatchReport};
