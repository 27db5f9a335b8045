//! Domain models for kontor

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A budget account in the user-facing chart-of-accounts tree.
///
/// Accounts form a forest via `parent_account_id`: no account may be its
/// own ancestor. Accounts are never hard-deleted while referenced by
/// transactions; archival is the intended removal path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    /// Display code, unique among siblings
    pub code: String,
    pub name: String,
    pub description: String,
    pub parent_account_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// An account annotated with its depth in the hierarchy (root = 0).
///
/// Produced by [`crate::Database::account_tree`], which orders nodes so a
/// parent always precedes all of its descendants. The display layer
/// derives indentation from `depth`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountNode {
    #[serde(flatten)]
    pub account: Account,
    pub depth: usize,
}

/// An external debit/credit account code as it appears in imported
/// financial data. Distinct from [`Account`]: this is the double-entry
/// side of a journal row, not a budget line.
///
/// Created on demand during import when a code is first encountered,
/// with empty name/description; `code` is unique across the set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionAccount {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A journal transaction.
///
/// Created only through the import pipeline. Immutable once created
/// except for `assigned_account_id` and the `voided` flag (cancellation
/// is append-only: a transaction is never deleted, only marked void).
/// `content_hash` stays stable regardless of later mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub booked_at: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub debit_account_id: i64,
    pub debit_account_code: String,
    pub credit_account_id: i64,
    pub credit_account_code: String,
    /// Budget account this transaction is attributed to, if any
    pub assigned_account_id: Option<i64>,
    pub assigned_account_name: Option<String>,
    pub content_hash: String,
    pub voided: bool,
    pub created_at: DateTime<Utc>,
}

/// A normalized transaction candidate produced by the file parser,
/// before fingerprinting and account resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRow {
    pub booked_at: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub debit_account_code: String,
    pub credit_account_code: String,
}

/// Supported journal export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportType {
    /// Lexware Buchhaltung journal export (semicolon-delimited CSV)
    Lexware,
}

impl ImportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexware => "lexware",
        }
    }
}

impl std::str::FromStr for ImportType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexware" => Ok(Self::Lexware),
            _ => Err(format!("Unknown import type: {}", s)),
        }
    }
}

impl std::fmt::Display for ImportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-row budget account assignment supplied by the caller after
/// previewing parsed rows, keyed by row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowAssignment {
    /// Do not import this row at all
    Ignore,
    /// Attribute the row to this budget account
    Account(i64),
}

/// Audit record for one import batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSession {
    pub id: i64,
    pub filename: Option<String>,
    pub import_type: ImportType,
    pub imported_count: i64,
    pub skipped_count: i64,
    pub ignored_count: i64,
    pub created_at: DateTime<Utc>,
}

/// A budget plan covering a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An append-only named snapshot point of a budget, used for
/// target-vs-actual comparison. Revisions are ordered by creation time
/// and never reordered; only the most recent one may be edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRevision {
    pub id: i64,
    pub budget_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
