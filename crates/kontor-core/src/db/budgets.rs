//! Budget and revision operations
//!
//! A budget owns an ordered sequence of revisions. Revisions are an
//! append-only audit trail: they are never reordered or deleted, and only
//! the most recent one may still be edited.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetRevision};

fn map_budget(row: &rusqlite::Row<'_>) -> rusqlite::Result<Budget> {
    let period_start: Option<String> = row.get(3)?;
    let period_end: Option<String> = row.get(4)?;
    let created_at_str: String = row.get(6)?;
    let updated_at_str: String = row.get(7)?;

    Ok(Budget {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        period_start: period_start.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        period_end: period_end.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        is_closed: row.get(5)?,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

fn map_revision(row: &rusqlite::Row<'_>) -> rusqlite::Result<BudgetRevision> {
    let created_at_str: String = row.get(4)?;
    Ok(BudgetRevision {
        id: row.get(0)?,
        budget_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: parse_datetime(&created_at_str),
    })
}

const BUDGET_COLUMNS: &str =
    "id, name, description, period_start, period_end, is_closed, created_at, updated_at";

impl Database {
    /// Create a budget
    pub fn create_budget(
        &self,
        name: &str,
        description: &str,
        period_start: Option<NaiveDate>,
        period_end: Option<NaiveDate>,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budgets (name, description, period_start, period_end) VALUES (?, ?, ?, ?)",
            params![
                name,
                description,
                period_start.map(|d| d.format("%Y-%m-%d").to_string()),
                period_end.map(|d| d.format("%Y-%m-%d").to_string()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List all budgets
    pub fn list_budgets(&self) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budgets ORDER BY created_at DESC, id DESC",
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map([], map_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(budgets)
    }

    /// Get a budget by ID
    pub fn get_budget(&self, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                &format!("SELECT {} FROM budgets WHERE id = ?", BUDGET_COLUMNS),
                params![id],
                map_budget,
            )
            .optional()?;
        Ok(budget)
    }

    /// Mark a budget as closed
    pub fn close_budget(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE budgets SET is_closed = 1, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("budget {}", id)));
        }
        Ok(())
    }

    /// Append a revision to a budget
    pub fn create_budget_revision(
        &self,
        budget_id: i64,
        name: &str,
        description: &str,
    ) -> Result<i64> {
        let conn = self.conn()?;

        let exists: Option<i64> = conn
            .query_row("SELECT id FROM budgets WHERE id = ?", params![budget_id], |r| {
                r.get(0)
            })
            .optional()?;
        if exists.is_none() {
            return Err(Error::NotFound(format!("budget {}", budget_id)));
        }

        conn.execute(
            "INSERT INTO budget_revisions (budget_id, name, description) VALUES (?, ?, ?)",
            params![budget_id, name, description],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a budget's revisions in creation order
    pub fn list_budget_revisions(&self, budget_id: i64) -> Result<Vec<BudgetRevision>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, budget_id, name, description, created_at FROM budget_revisions \
             WHERE budget_id = ? ORDER BY created_at ASC, id ASC",
        )?;

        let revisions = stmt
            .query_map(params![budget_id], map_revision)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(revisions)
    }

    /// Edit a revision. Prior revisions are a frozen audit trail: only the
    /// most recent revision of its budget may be changed.
    pub fn update_budget_revision(&self, revision_id: i64, name: &str, description: &str) -> Result<()> {
        let conn = self.conn()?;

        let budget_id: Option<i64> = conn
            .query_row(
                "SELECT budget_id FROM budget_revisions WHERE id = ?",
                params![revision_id],
                |r| r.get(0),
            )
            .optional()?;
        let budget_id =
            budget_id.ok_or_else(|| Error::NotFound(format!("revision {}", revision_id)))?;

        let latest: i64 = conn.query_row(
            "SELECT id FROM budget_revisions WHERE budget_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT 1",
            params![budget_id],
            |r| r.get(0),
        )?;
        if latest != revision_id {
            return Err(Error::InvalidData(format!(
                "revision {} is frozen: only the most recent revision can be edited",
                revision_id
            )));
        }

        conn.execute(
            "UPDATE budget_revisions SET name = ?, description = ? WHERE id = ?",
            params![name, description, revision_id],
        )?;
        Ok(())
    }
}
