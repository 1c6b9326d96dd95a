use thiserror::Error;

/// Failures reading from a remote ledger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    #[error("Ledger read timed out after {0} ms")]
    Timeout(u64),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;
