use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid format version {value:?}: {reason}")]
    InvalidFormatVersion { value: String, reason: &'static str },
    #[error("unknown diff type: {0}")]
    UnknownDiffType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
