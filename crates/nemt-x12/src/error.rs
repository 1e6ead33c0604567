//! Error types for X12 assembly.

use thiserror::Error;

/// Errors that can occur while assembling an X12 interchange.
#[derive(Debug, Error)]
pub enum X12Error {
    /// A fixed-width envelope field is longer than its slot.
    #[error("{field} value '{value}' exceeds fixed width of {width}")]
    FieldTooWide {
        field: &'static str,
        value: String,
        width: usize,
    },

    /// A raw envelope field carries a separator or line break.
    #[error("{field} value '{value}' contains reserved character '{character}'")]
    ReservedCharacter {
        field: &'static str,
        value: String,
        character: char,
    },

    /// Delimiter set is unusable.
    #[error("invalid delimiters: {message}")]
    InvalidDelimiters { message: String },

    /// Envelope construct opened or closed out of order.
    #[error("envelope out of order: {message}")]
    EnvelopeOrder { message: String },

    /// Output was finished while an envelope level was still open.
    #[error("unterminated {level} envelope")]
    Unterminated { level: &'static str },
}

/// Result type alias for X12 operations.
pub type Result<T> = std::result::Result<T, X12Error>;

impl X12Error {
    /// Create a FieldTooWide error.
    pub fn field_too_wide(field: &'static str, value: impl Into<String>, width: usize) -> Self {
        Self::FieldTooWide {
            field,
            value: value.into(),
            width,
        }
    }

    /// Create a ReservedCharacter error.
    pub fn reserved_character(
        field: &'static str,
        value: impl Into<String>,
        character: char,
    ) -> Self {
        Self::ReservedCharacter {
            field,
            value: value.into(),
            character,
        }
    }

    /// Create an InvalidDelimiters error.
    pub fn invalid_delimiters(message: impl Into<String>) -> Self {
        Self::InvalidDelimiters {
            message: message.into(),
        }
    }

    /// Create an EnvelopeOrder error.
    pub fn envelope_order(message: impl Into<String>) -> Self {
        Self::EnvelopeOrder {
            message: message.into(),
        }
    }
}
