//! Interchange, group and transaction control numbers.

use serde::{Deserialize, Serialize};

/// Largest value that fits the nine-digit ISA13/GS06/ST02 slots.
pub const MAX_CONTROL_NUMBER: u32 = 999_999_999;

/// Three independent, monotonically increasing control-number counters.
///
/// One instance is shared by every claim written into the same interchange.
/// The type is not internally synchronized; callers hand out `&mut` access,
/// which serializes use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlNumbers {
    interchange: u32,
    group: u32,
    transaction: u32,
}

impl Default for ControlNumbers {
    fn default() -> Self {
        Self::starting_at(1, 1, 1)
    }
}

impl ControlNumbers {
    /// Counters starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters starting at explicit values (zero is treated as 1).
    #[must_use]
    pub fn starting_at(interchange: u32, group: u32, transaction: u32) -> Self {
        Self {
            interchange: interchange.clamp(1, MAX_CONTROL_NUMBER),
            group: group.clamp(1, MAX_CONTROL_NUMBER),
            transaction: transaction.clamp(1, MAX_CONTROL_NUMBER),
        }
    }

    /// Take the next interchange control number (ISA13/IEA02).
    pub fn next_interchange(&mut self) -> u32 {
        advance(&mut self.interchange)
    }

    /// Take the next functional group control number (GS06/GE02).
    pub fn next_group(&mut self) -> u32 {
        advance(&mut self.group)
    }

    /// Take the next transaction set control number (ST02/SE02).
    pub fn next_transaction(&mut self) -> u32 {
        advance(&mut self.transaction)
    }

    /// Value the next interchange call will return.
    #[must_use]
    pub fn peek_interchange(&self) -> u32 {
        self.interchange
    }

    /// Value the next group call will return.
    #[must_use]
    pub fn peek_group(&self) -> u32 {
        self.group
    }

    /// Value the next transaction call will return.
    #[must_use]
    pub fn peek_transaction(&self) -> u32 {
        self.transaction
    }
}

fn advance(counter: &mut u32) -> u32 {
    let current = *counter;
    *counter = if current >= MAX_CONTROL_NUMBER {
        1
    } else {
        current + 1
    };
    current
}
