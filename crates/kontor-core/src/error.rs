//! Error types for kontor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A malformed row or field in an import file. Fatal to the whole
    /// batch: nothing is persisted when parsing fails.
    #[error("Parse error at row {row}, field '{field}': {message}")]
    Parse {
        row: usize,
        field: &'static str,
        message: String,
    },

    /// Reassigning an account's parent would make the account its own
    /// ancestor. The hierarchy is left unchanged.
    #[error("Account {account_id} cannot be parented under {parent_id}: would create a cycle")]
    Cycle { account_id: i64, parent_id: i64 },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
