use std::sync::PoisonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No test history available. Run some tests first.")]
    NoData,

    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed history document: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Storage mutex is poisoned.")]
    PoisonData,
}

impl<T> From<PoisonError<T>> for PersistenceError {
    fn from(_err: PoisonError<T>) -> Self {
        Self::PoisonData
    }
}
