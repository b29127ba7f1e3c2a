use thiserror::Error;

use crate::domain::{TransactionId, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP-style status for a request layer sitting in front of the ledger.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) => 400,
            AppError::TransactionNotFound(_) => 404,
            AppError::Store(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::TransactionNotFound(_))
    }
}
