//! Error types for statement ingestion

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Balance anchor not found: {anchor}")]
    BalanceAnchorNotFound { anchor: &'static str },

    #[error("Malformed money token: {0:?}")]
    MalformedMoneyToken(String),

    #[error("Unsupported institution: {0}")]
    UnknownInstitution(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
