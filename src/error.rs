//! Error types for the ledger.

use crate::types::RecordId;
use thiserror::Error;

/// Main error type for ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Ledger is locked by another process")]
    Locked,

    #[error("Ledger not initialized")]
    NotInitialized,

    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("Invalid report granularity: {0:?}")]
    InvalidGranularity(String),

    #[error("No customer data available.")]
    NoData,

    #[error("No data to export.")]
    NothingToExport,

    #[error("Please calculate the total first.")]
    TotalNotComputed,

    #[error("No customer data found. Please start from the entry page.")]
    NoActiveVisit,

    #[error("Record index {index} out of range (ledger holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Editing records is not supported (requested index {0})")]
    EditNotSupported(usize),
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            LedgerError::Deserialization(e.to_string())
        } else {
            LedgerError::Serialization(e.to_string())
        }
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
