//! Import session audit trail
//!
//! One row per import batch, recording what was imported and what was
//! skipped. Sessions are written inside the batch transaction, so a failed
//! import leaves no session row behind.

use rusqlite::{params, Connection};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{ImportSession, ImportType};

pub(crate) fn create_import_session(
    conn: &Connection,
    filename: Option<&str>,
    import_type: ImportType,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO import_sessions (filename, import_type) VALUES (?, ?)",
        params![filename, import_type.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn update_import_session_counts(
    conn: &Connection,
    session_id: i64,
    imported: i64,
    skipped: i64,
    ignored: i64,
) -> Result<()> {
    conn.execute(
        "UPDATE import_sessions SET imported_count = ?, skipped_count = ?, ignored_count = ? \
         WHERE id = ?",
        params![imported, skipped, ignored, session_id],
    )?;
    Ok(())
}

fn map_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<ImportSession> {
    let import_type_str: String = row.get(2)?;
    let created_at_str: String = row.get(6)?;
    Ok(ImportSession {
        id: row.get(0)?,
        filename: row.get(1)?,
        import_type: import_type_str.parse().unwrap_or(ImportType::Lexware),
        imported_count: row.get(3)?,
        skipped_count: row.get(4)?,
        ignored_count: row.get(5)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// List import sessions, newest first
    pub fn list_import_sessions(&self, limit: i64) -> Result<Vec<ImportSession>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, filename, import_type, imported_count, skipped_count, ignored_count, \
             created_at FROM import_sessions ORDER BY created_at DESC, id DESC LIMIT ?",
        )?;

        let sessions = stmt
            .query_map(params![limit], map_session)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(sessions)
    }
}
