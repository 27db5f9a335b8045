//! Journal transaction operations

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{ParsedRow, Transaction};

/// Result of inserting a transaction
#[derive(Debug, Clone)]
pub enum TransactionInsertResult {
    /// Transaction was inserted successfully, contains new transaction ID
    Inserted(i64),
    /// Transaction was a duplicate, contains existing transaction ID
    Duplicate(i64),
}

/// Insert a journal transaction, skipping duplicates by content hash.
///
/// Runs on the caller's connection so the importer can scope all inserts
/// of a batch to one transaction. A uniqueness-constraint conflict on
/// `content_hash` (a concurrent import racing on the same row) is folded
/// into the duplicate result rather than failing the batch; any other
/// constraint failure propagates and aborts the batch.
pub(crate) fn insert_transaction(
    conn: &Connection,
    row: &ParsedRow,
    debit_account_id: i64,
    credit_account_id: i64,
    assigned_account_id: Option<i64>,
    content_hash: &str,
    import_session_id: i64,
) -> Result<TransactionInsertResult> {
    // Check for duplicate
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM transactions WHERE content_hash = ?",
            params![content_hash],
            |r| r.get(0),
        )
        .optional()?;

    if let Some(existing_id) = existing {
        return Ok(TransactionInsertResult::Duplicate(existing_id));
    }

    let insert = conn.execute(
        r#"
        INSERT INTO transactions (booked_at, amount, description, debit_account_id,
            credit_account_id, assigned_account_id, content_hash, import_session_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            row.booked_at.format("%Y-%m-%d").to_string(),
            row.amount.normalize().to_string(),
            row.description,
            debit_account_id,
            credit_account_id,
            assigned_account_id,
            content_hash,
            import_session_id,
        ],
    );

    match insert {
        Ok(_) => Ok(TransactionInsertResult::Inserted(conn.last_insert_rowid())),
        Err(rusqlite::Error::SqliteFailure(e, Some(ref msg)))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("transactions.content_hash") =>
        {
            // Lost the race to a concurrent import; the winning row is
            // committed and visible
            let existing_id: i64 = conn.query_row(
                "SELECT id FROM transactions WHERE content_hash = ?",
                params![content_hash],
                |r| r.get(0),
            )?;
            Ok(TransactionInsertResult::Duplicate(existing_id))
        }
        Err(e) => Err(e.into()),
    }
}

fn map_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let booked_at_str: String = row.get(1)?;
    let amount_str: String = row.get(2)?;
    let created_at_str: String = row.get(11)?;

    let booked_at = NaiveDate::parse_from_str(&booked_at_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let amount = Decimal::from_str(&amount_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        booked_at,
        amount,
        description: row.get(3)?,
        debit_account_id: row.get(4)?,
        debit_account_code: row.get(5)?,
        credit_account_id: row.get(6)?,
        credit_account_code: row.get(7)?,
        assigned_account_id: row.get(8)?,
        assigned_account_name: row.get(9)?,
        voided: row.get(10)?,
        created_at: parse_datetime(&created_at_str),
        content_hash: row.get(12)?,
    })
}

const TRANSACTION_SELECT: &str = r#"
    SELECT t.id, t.booked_at, t.amount, t.description,
           t.debit_account_id, d.code, t.credit_account_id, c.code,
           t.assigned_account_id, a.name, t.voided, t.created_at, t.content_hash
    FROM transactions t
    JOIN transaction_accounts d ON d.id = t.debit_account_id
    JOIN transaction_accounts c ON c.id = t.credit_account_id
    LEFT JOIN accounts a ON a.id = t.assigned_account_id
"#;

impl Database {
    /// List journal transactions, newest first
    pub fn list_transactions(&self, limit: i64, offset: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY t.created_at DESC, t.id DESC LIMIT ? OFFSET ?",
            TRANSACTION_SELECT
        ))?;

        let transactions = stmt
            .query_map(params![limit, offset], map_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    /// Get a transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let transaction = conn
            .query_row(
                &format!("{} WHERE t.id = ?", TRANSACTION_SELECT),
                params![id],
                map_transaction,
            )
            .optional()?;
        Ok(transaction)
    }

    /// Attribute a transaction to a budget account, or clear the
    /// attribution. This and voiding are the only mutations a transaction
    /// supports after import.
    pub fn assign_transaction_account(
        &self,
        transaction_id: i64,
        account_id: Option<i64>,
    ) -> Result<()> {
        let conn = self.conn()?;

        if let Some(account_id) = account_id {
            let exists: Option<i64> = conn
                .query_row(
                    "SELECT id FROM accounts WHERE id = ?",
                    params![account_id],
                    |r| r.get(0),
                )
                .optional()?;
            if exists.is_none() {
                return Err(Error::NotFound(format!("account {}", account_id)));
            }
        }

        let changed = conn.execute(
            "UPDATE transactions SET assigned_account_id = ? WHERE id = ?",
            params![account_id, transaction_id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("transaction {}", transaction_id)));
        }
        Ok(())
    }

    /// Mark a transaction as void. Append-only semantics: the row is never
    /// deleted and its content hash stays in place, so re-importing the
    /// same journal still treats the row as already imported.
    pub fn void_transaction(&self, transaction_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE transactions SET voided = 1 WHERE id = ?",
            params![transaction_id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("transaction {}", transaction_id)));
        }
        Ok(())
    }

    /// Count all journal transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))?;
        Ok(count)
    }
}
