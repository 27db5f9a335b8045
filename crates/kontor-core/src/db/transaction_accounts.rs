//! Transaction account operations
//!
//! Transaction accounts are the external debit/credit codes appearing in
//! imported journals. The importer resolves the distinct codes of a batch
//! in one lookup and creates missing ones on first sight.

use std::collections::{BTreeSet, HashMap};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::TransactionAccount;

fn map_transaction_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<TransactionAccount> {
    let created_at_str: String = row.get(4)?;
    Ok(TransactionAccount {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: parse_datetime(&created_at_str),
    })
}

/// Resolve every code to a transaction account id, creating missing ones.
///
/// Performs a single `IN (...)` lookup covering all codes, then inserts a
/// record with empty name/description for each code with no match. Newly
/// created records land in the returned map, so later rows of the same
/// batch referencing the same new code reuse it. Runs on the caller's
/// connection so the importer can scope it to the batch transaction.
pub(crate) fn resolve_transaction_accounts(
    conn: &Connection,
    codes: &BTreeSet<String>,
) -> Result<HashMap<String, i64>> {
    let mut resolved = HashMap::with_capacity(codes.len());
    if codes.is_empty() {
        return Ok(resolved);
    }

    let placeholders: Vec<&str> = codes.iter().map(|_| "?").collect();
    let sql = format!(
        "SELECT id, code FROM transaction_accounts WHERE code IN ({})",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let params = rusqlite::params_from_iter(codes.iter());
    let rows = stmt.query_map(params, |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (id, code) = row?;
        resolved.insert(code, id);
    }

    let mut created = 0;
    for code in codes {
        if resolved.contains_key(code) {
            continue;
        }
        conn.execute(
            "INSERT INTO transaction_accounts (code, name, description) VALUES (?, '', '')",
            params![code],
        )?;
        resolved.insert(code.clone(), conn.last_insert_rowid());
        created += 1;
    }

    if created > 0 {
        debug!("Created {} new transaction accounts", created);
    }

    Ok(resolved)
}

/// Fetch the full records for a set of transaction account ids
pub(crate) fn transaction_accounts_by_ids(
    conn: &Connection,
    ids: &[i64],
) -> Result<Vec<TransactionAccount>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders: Vec<&str> = ids.iter().map(|_| "?").collect();
    let sql = format!(
        "SELECT id, code, name, description, created_at FROM transaction_accounts \
         WHERE id IN ({}) ORDER BY code",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let accounts = stmt
        .query_map(rusqlite::params_from_iter(ids.iter()), map_transaction_account)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(accounts)
}

impl Database {
    /// List all transaction accounts ordered by code
    pub fn list_transaction_accounts(&self) -> Result<Vec<TransactionAccount>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, code, name, description, created_at FROM transaction_accounts ORDER BY code",
        )?;

        let accounts = stmt
            .query_map([], map_transaction_account)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(accounts)
    }

    /// Get a transaction account by its external code
    pub fn get_transaction_account_by_code(&self, code: &str) -> Result<Option<TransactionAccount>> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                "SELECT id, code, name, description, created_at FROM transaction_accounts WHERE code = ?",
                params![code],
                map_transaction_account,
            )
            .optional()?;
        Ok(account)
    }

    /// Update a transaction account's display fields. The code itself is
    /// fixed: it is the identity the importer matches on.
    pub fn update_transaction_account(&self, id: i64, name: &str, description: &str) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE transaction_accounts SET name = ?, description = ? WHERE id = ?",
            params![name, description, id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("transaction account {}", id)));
        }
        Ok(())
    }
}
