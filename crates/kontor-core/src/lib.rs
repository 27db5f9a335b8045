//! Kontor Core Library
//!
//! Shared functionality for the kontor budget administration tool:
//! - Database access and migrations
//! - Journal export parsers (Lexware CSV)
//! - Transaction content hashing for duplicate detection
//! - Import orchestration (parse, resolve accounts, persist)
//! - Budget account hierarchy with cycle protection

pub mod db;
pub mod error;
pub mod fingerprint;
pub mod import;
pub mod importer;
pub mod models;

pub use db::{Database, TransactionInsertResult};
pub use error::{Error, Result};
pub use importer::{ImportSummary, Importer};
pub use models::{
    Account, AccountNode, Budget, BudgetRevision, ImportSession, ImportType, ParsedRow,
    RowAssignment, Transaction, TransactionAccount,
};
