use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown payer profile: {key}")]
    UnknownPayer { key: String },
    #[error("invalid {kind} code: {value}")]
    InvalidCode { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
