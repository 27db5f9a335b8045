//! Import orchestration
//!
//! Composes parse → fingerprint → account resolution → persistence into one
//! transactional unit of work. All persistence effects of a batch (account
//! creation, transaction insertion, the session row) commit together or not
//! at all; a failed parse aborts before any write. Duplicate rows are
//! skipped, counted, and never an error: a batch with zero new rows still
//! succeeds.

use std::collections::{BTreeSet, HashMap};
use std::io::Read;

use rusqlite::{params, OptionalExtension, TransactionBehavior};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::transactions::TransactionInsertResult;
use crate::db::{import_history, transaction_accounts, transactions, Database};
use crate::error::{Error, Result};
use crate::fingerprint::content_hash;
use crate::import::parse_rows;
use crate::models::{ImportType, RowAssignment, TransactionAccount};

/// Outcome of one import batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub session_id: i64,
    /// Rows newly inserted
    pub imported: usize,
    /// Rows whose fingerprint already existed
    pub skipped_duplicates: usize,
    /// Rows the caller marked as ignore
    pub ignored: usize,
    /// The resolved/created transaction account set of the batch
    pub accounts: Vec<TransactionAccount>,
}

/// Runs import batches against a database.
///
/// Imports only ever create transaction accounts and insert transactions;
/// the budget account hierarchy is never mutated here.
pub struct Importer<'a> {
    db: &'a Database,
}

impl<'a> Importer<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Import one export file as a single atomic batch.
    ///
    /// `assignments` maps row indices (0-based, in file order) to a budget
    /// account attribution or an explicit ignore, as confirmed by the
    /// caller after previewing the parsed rows. Rows without an entry are
    /// imported unassigned.
    pub fn import<R: Read>(
        &self,
        reader: R,
        import_type: ImportType,
        filename: Option<&str>,
        assignments: &HashMap<usize, RowAssignment>,
    ) -> Result<ImportSummary> {
        // Parse completely before touching storage: a malformed row aborts
        // the batch with nothing written
        let rows = parse_rows(reader, import_type)?;

        if let Some(&idx) = assignments.keys().find(|&&idx| idx >= rows.len()) {
            return Err(Error::InvalidData(format!(
                "assignment references row {} but the file has {} rows",
                idx,
                rows.len()
            )));
        }

        let mut conn = self.db.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Assigned budget accounts must exist before any row is written
        let assigned_ids: BTreeSet<i64> = assignments
            .values()
            .filter_map(|a| match a {
                RowAssignment::Account(id) => Some(*id),
                RowAssignment::Ignore => None,
            })
            .collect();
        for id in &assigned_ids {
            let exists: Option<i64> = tx
                .query_row("SELECT id FROM accounts WHERE id = ?", params![id], |r| {
                    r.get(0)
                })
                .optional()?;
            if exists.is_none() {
                return Err(Error::NotFound(format!("account {}", id)));
            }
        }

        // Batch-resolve every distinct code referenced by the file
        let codes: BTreeSet<String> = rows
            .iter()
            .flat_map(|row| {
                [
                    row.debit_account_code.clone(),
                    row.credit_account_code.clone(),
                ]
            })
            .collect();
        let resolved = transaction_accounts::resolve_transaction_accounts(&tx, &codes)?;

        let session_id = import_history::create_import_session(&tx, filename, import_type)?;

        let mut imported = 0usize;
        let mut skipped = 0usize;
        let mut ignored = 0usize;

        // Rows are processed in file order; within one batch a repeated row
        // hits the duplicate check against its own earlier insert
        for (i, row) in rows.iter().enumerate() {
            let assigned_account_id = match assignments.get(&i) {
                Some(RowAssignment::Ignore) => {
                    ignored += 1;
                    continue;
                }
                Some(RowAssignment::Account(id)) => Some(*id),
                None => None,
            };

            let hash = content_hash(row);
            let debit_account_id = resolved[&row.debit_account_code];
            let credit_account_id = resolved[&row.credit_account_code];

            match transactions::insert_transaction(
                &tx,
                row,
                debit_account_id,
                credit_account_id,
                assigned_account_id,
                &hash,
                session_id,
            )? {
                TransactionInsertResult::Inserted(_) => imported += 1,
                TransactionInsertResult::Duplicate(_) => skipped += 1,
            }
        }

        import_history::update_import_session_counts(
            &tx,
            session_id,
            imported as i64,
            skipped as i64,
            ignored as i64,
        )?;

        let mut account_ids: Vec<i64> = resolved.values().copied().collect();
        account_ids.sort_unstable();
        let accounts = transaction_accounts::transaction_accounts_by_ids(&tx, &account_ids)?;

        tx.commit()?;

        info!(
            session_id,
            imported, skipped, ignored, "Import batch committed"
        );

        Ok(ImportSummary {
            session_id,
            imported,
            skipped_duplicates: skipped,
            ignored,
            accounts,
        })
    }
}
