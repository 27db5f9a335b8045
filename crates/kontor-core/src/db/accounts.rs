//! Budget account hierarchy operations
//!
//! Accounts reference each other through `parent_account_id` and must stay
//! a forest. The cycle check runs inside the same transaction as the
//! parent-pointer write so two concurrent reparenting operations cannot
//! each pass against a stale view and jointly introduce a cycle.

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use tracing::debug;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Account, AccountNode};

fn map_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    let created_at_str: String = row.get(5)?;
    Ok(Account {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        parent_account_id: row.get(4)?,
        created_at: parse_datetime(&created_at_str),
    })
}

const ACCOUNT_COLUMNS: &str = "id, code, name, description, parent_account_id, created_at";

/// Look up an account's parent pointer. Outer None means the account
/// itself does not exist.
fn parent_of(conn: &Connection, id: i64) -> Result<Option<Option<i64>>> {
    let parent = conn
        .query_row(
            "SELECT parent_account_id FROM accounts WHERE id = ?",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(parent)
}

impl Database {
    /// Create a budget account, optionally under a parent
    pub fn create_account(
        &self,
        code: &str,
        name: &str,
        description: &str,
        parent_account_id: Option<i64>,
    ) -> Result<i64> {
        let conn = self.conn()?;

        if let Some(parent_id) = parent_account_id {
            if parent_of(&conn, parent_id)?.is_none() {
                return Err(Error::NotFound(format!("account {}", parent_id)));
            }
        }

        conn.execute(
            "INSERT INTO accounts (code, name, description, parent_account_id) VALUES (?, ?, ?, ?)",
            params![code, name, description, parent_account_id],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get an account by ID
    pub fn get_account(&self, id: i64) -> Result<Option<Account>> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                &format!("SELECT {} FROM accounts WHERE id = ?", ACCOUNT_COLUMNS),
                params![id],
                map_account,
            )
            .optional()?;
        Ok(account)
    }

    /// Update an account's display fields (parent changes go through
    /// `set_account_parent`)
    pub fn update_account(&self, id: i64, code: &str, name: &str, description: &str) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE accounts SET code = ?, name = ?, description = ? WHERE id = ?",
            params![code, name, description, id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("account {}", id)));
        }
        Ok(())
    }

    /// Reassign an account's parent link.
    ///
    /// Fails with [`Error::Cycle`] if `new_parent_id` equals `account_id`
    /// or if `account_id` appears among the ancestors of `new_parent_id`,
    /// which would make the account its own descendant. The check walks
    /// upward from the proposed parent against the current persisted state
    /// inside an IMMEDIATE transaction; the hierarchy is unchanged on
    /// error.
    pub fn set_account_parent(&self, account_id: i64, new_parent_id: Option<i64>) -> Result<()> {
        let mut conn = self.conn()?;
        // IMMEDIATE takes the write lock up front so the ancestor walk and
        // the parent-pointer update see one consistent state
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if parent_of(&tx, account_id)?.is_none() {
            return Err(Error::NotFound(format!("account {}", account_id)));
        }

        if let Some(parent_id) = new_parent_id {
            if parent_id == account_id {
                return Err(Error::Cycle {
                    account_id,
                    parent_id,
                });
            }

            // Walk from the proposed parent upward via parent links. The
            // walk is bounded by the total node count: if it fails to
            // terminate within that many steps the stored data already
            // contains a cycle, and the reassignment is rejected the same
            // way.
            let total: i64 = tx.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;

            let mut current = Some(parent_id);
            let mut steps: i64 = 0;
            while let Some(id) = current {
                if id == account_id {
                    return Err(Error::Cycle {
                        account_id,
                        parent_id,
                    });
                }
                steps += 1;
                if steps > total {
                    debug!("ancestor walk exceeded {} accounts, treating as cycle", total);
                    return Err(Error::Cycle {
                        account_id,
                        parent_id,
                    });
                }
                current = parent_of(&tx, id)?
                    .ok_or_else(|| Error::NotFound(format!("account {}", id)))?;
            }
        }

        tx.execute(
            "UPDATE accounts SET parent_account_id = ? WHERE id = ?",
            params![new_parent_id, account_id],
        )?;
        tx.commit()?;

        Ok(())
    }

    /// Return every account annotated with its depth, in display order.
    ///
    /// Siblings are ordered by code ascending and the traversal is a
    /// pre-order depth-first walk from the roots, so a parent always
    /// precedes all of its descendants. The display layer depends on this
    /// ordering for indentation.
    pub fn account_tree(&self) -> Result<Vec<AccountNode>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM accounts ORDER BY code ASC",
            ACCOUNT_COLUMNS
        ))?;

        let accounts = stmt
            .query_map([], map_account)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Children grouped by parent, preserving the code ordering
        let mut children: std::collections::HashMap<i64, Vec<&Account>> =
            std::collections::HashMap::new();
        let mut roots: Vec<&Account> = Vec::new();
        for account in &accounts {
            match account.parent_account_id {
                Some(parent_id) => children.entry(parent_id).or_default().push(account),
                None => roots.push(account),
            }
        }

        fn walk(
            account: &Account,
            depth: usize,
            children: &std::collections::HashMap<i64, Vec<&Account>>,
            out: &mut Vec<AccountNode>,
        ) {
            out.push(AccountNode {
                account: account.clone(),
                depth,
            });
            if let Some(kids) = children.get(&account.id) {
                for child in kids {
                    walk(child, depth + 1, children, out);
                }
            }
        }

        let mut nodes = Vec::with_capacity(accounts.len());
        for root in roots {
            walk(root, 0, &children, &mut nodes);
        }

        Ok(nodes)
    }
}
