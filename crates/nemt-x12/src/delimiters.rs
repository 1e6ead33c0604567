//! Delimiter set and data-value escaping.

use serde::{Deserialize, Serialize};

use crate::error::{Result, X12Error};

/// Character substituted for a reserved delimiter found inside a data value.
pub const REPLACEMENT_CHAR: char = ' ';

/// The four separators of an X12 interchange.
///
/// The element separator and component separator are also declared in the
/// ISA header itself (ISA position 3 and ISA16), so a reader can recover them
/// from the first segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delimiters {
    /// Separates elements within a segment.
    pub element: char,
    /// Terminates a segment.
    pub segment: char,
    /// Separates components within a composite element.
    pub component: char,
    /// Separates repeated occurrences of an element (ISA11).
    pub repetition: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            element: '*',
            segment: '~',
            component: ':',
            repetition: '^',
        }
    }
}

impl Delimiters {
    /// Create a validated delimiter set.
    pub fn new(element: char, segment: char, component: char, repetition: char) -> Result<Self> {
        let delimiters = Self {
            element,
            segment,
            component,
            repetition,
        };
        delimiters.validate()?;
        Ok(delimiters)
    }

    /// Check that the separators are distinct and cannot appear in ordinary data.
    pub fn validate(&self) -> Result<()> {
        let all = self.as_array();
        for (idx, c) in all.iter().enumerate() {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                return Err(X12Error::invalid_delimiters(format!(
                    "'{c}' cannot be used as a separator"
                )));
            }
            if all[idx + 1..].contains(c) {
                return Err(X12Error::invalid_delimiters(format!(
                    "'{c}' is used for more than one separator"
                )));
            }
        }
        Ok(())
    }

    /// Whether `c` is one of the four separators.
    #[must_use]
    pub fn is_reserved(&self, c: char) -> bool {
        self.as_array().contains(&c)
    }

    /// Reject a value that is written verbatim, such as an ISA identifier.
    ///
    /// Raw fields bypass [`Delimiters::escape`], so any separator or line
    /// break in them is an error rather than a substitution.
    pub fn check_raw(&self, field: &'static str, value: &str) -> Result<()> {
        match value
            .chars()
            .find(|&c| self.is_reserved(c) || c == '\r' || c == '\n')
        {
            Some(character) => Err(X12Error::reserved_character(field, value, character)),
            None => Ok(()),
        }
    }

    /// Replace every reserved separator (and line break) inside a data value.
    ///
    /// The value keeps its length; offending characters become
    /// [`REPLACEMENT_CHAR`].
    #[must_use]
    pub fn escape(&self, value: &str) -> String {
        value
            .chars()
            .map(|c| {
                if self.is_reserved(c) || c == '\r' || c == '\n' {
                    REPLACEMENT_CHAR
                } else {
                    c
                }
            })
            .collect()
    }

    fn as_array(&self) -> [char; 4] {
        [self.element, self.segment, self.component, self.repetition]
    }
}
