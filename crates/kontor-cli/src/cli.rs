//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Kontor - Budget administration and journal reconciliation
#[derive(Parser)]
#[command(name = "kontor")]
#[command(about = "Self-hosted budget administration tool", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "kontor.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set KONTOR_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status (encryption, size, record counts)
    Status,

    /// Import a journal export file
    Import {
        /// Journal export file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Import format (auto-detected if not specified)
        #[arg(short = 't', long = "type")]
        import_type: Option<String>,

        /// Parse and show the rows without writing anything
        #[arg(long)]
        preview: bool,

        /// Per-row budget account assignment, e.g. --assign 0=12 --assign 3=ignore
        ///
        /// ROW is the 0-based row index shown by --preview. The value is a
        /// budget account ID, or "ignore" to skip the row entirely.
        #[arg(long = "assign", value_name = "ROW=ACCOUNT")]
        assignments: Vec<String>,
    },

    /// Manage the budget account hierarchy (list, add, update, set-parent)
    Accounts {
        #[command(subcommand)]
        action: Option<AccountsAction>,
    },

    /// Manage imported debit/credit account codes (list, set)
    TransactionAccounts {
        #[command(subcommand)]
        action: Option<TransactionAccountsAction>,
    },

    /// Manage journal transactions (list, show, assign, void)
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Manage budgets and their revisions
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Show import history
    Sessions {
        /// Maximum number of sessions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum AccountsAction {
    /// List the account hierarchy as an indented tree
    List,

    /// Add a budget account
    Add {
        /// Account code (unique among siblings)
        code: String,
        /// Display name
        name: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Parent account ID (omit for a root account)
        #[arg(short, long)]
        parent: Option<i64>,
    },

    /// Update an account's code, name, or description
    Update {
        /// Account ID
        id: i64,
        /// New account code
        code: String,
        /// New display name
        name: String,
        /// New description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Move an account under a new parent (or to the root)
    SetParent {
        /// Account ID to move
        id: i64,
        /// New parent account ID (omit to make it a root account)
        #[arg(short, long)]
        parent: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum TransactionAccountsAction {
    /// List all known debit/credit account codes
    List,

    /// Set the display name and description for a code
    Set {
        /// Transaction account ID
        id: i64,
        /// Display name
        name: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions, newest first
    List {
        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
        /// Number of transactions to skip
        #[arg(short, long, default_value = "0")]
        offset: i64,
    },

    /// Show one transaction in full
    Show {
        /// Transaction ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Attribute a transaction to a budget account
    Assign {
        /// Transaction ID
        transaction_id: i64,
        /// Budget account ID
        account_id: i64,
    },

    /// Clear a transaction's budget account attribution
    Unassign {
        /// Transaction ID
        transaction_id: i64,
    },

    /// Mark a transaction as void (kept for audit, excluded from reports)
    Void {
        /// Transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// List all budgets
    List,

    /// Create a budget
    Add {
        /// Budget name
        name: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Period start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Period end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// Mark a budget as closed
    Close {
        /// Budget ID
        id: i64,
    },

    /// List a budget's revisions in creation order
    Revisions {
        /// Budget ID
        budget_id: i64,
    },

    /// Append a new revision to a budget
    Revise {
        /// Budget ID
        budget_id: i64,
        /// Revision name (e.g. "Beschluss 2024-03")
        name: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Edit the most recent revision of a budget
    EditRevision {
        /// Revision ID
        id: i64,
        /// New revision name
        name: String,
        /// New description
        #[arg(short, long, default_value = "")]
        description: String,
    },
}
