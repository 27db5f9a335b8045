//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use kontor_core::Database;
use kontor_core::RowAssignment;
use tempfile::NamedTempFile;

use crate::commands::{self, truncate};

const JOURNAL: &str = "\
Datum;Buchungstext;Betrag;Sollkonto;Habenkonto
15.01.2024;Miete Januar;1.250,00;4210;1200
20.01.2024;Versicherung;89,90;4360;1200
";

fn journal_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(JOURNAL.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer description", 10), "a longe...");
}

#[test]
fn test_parse_assignment() {
    assert_eq!(
        commands::parse_assignment("0=12").unwrap(),
        (0, RowAssignment::Account(12))
    );
    assert_eq!(
        commands::parse_assignment("3=ignore").unwrap(),
        (3, RowAssignment::Ignore)
    );
    assert_eq!(
        commands::parse_assignment("3=IGNORE").unwrap(),
        (3, RowAssignment::Ignore)
    );
    assert!(commands::parse_assignment("noequals").is_err());
    assert!(commands::parse_assignment("x=12").is_err());
    assert!(commands::parse_assignment("0=abc").is_err());
}

// ========== Accounts Command Tests ==========

#[test]
fn test_cmd_accounts_add_and_list() {
    let db = Database::in_memory().unwrap();

    commands::cmd_accounts_add(&db, "100", "Verwaltung", "", None).unwrap();
    let tree = db.account_tree().unwrap();
    assert_eq!(tree.len(), 1);

    let parent_id = tree[0].account.id;
    commands::cmd_accounts_add(&db, "110", "Personal", "", Some(parent_id)).unwrap();

    let result = commands::cmd_accounts_list(&db);
    assert!(result.is_ok());

    let tree = db.account_tree().unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[1].depth, 1);
}

#[test]
fn test_cmd_accounts_set_parent_rejects_cycle() {
    let db = Database::in_memory().unwrap();

    let a = db.create_account("100", "A", "", None).unwrap();
    let b = db.create_account("110", "B", "", Some(a)).unwrap();

    let result = commands::cmd_accounts_set_parent(&db, a, Some(b));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("cycle"));
}

// ========== Import Command Tests ==========

#[test]
fn test_cmd_import() {
    let db = Database::in_memory().unwrap();
    let file = journal_file();

    let result = commands::cmd_import(&db, file.path(), None, false, &[]);
    assert!(result.is_ok());

    assert_eq!(db.count_transactions().unwrap(), 2);
    assert_eq!(db.list_transaction_accounts().unwrap().len(), 3);

    let sessions = db.list_import_sessions(10).unwrap();
    assert_eq!(sessions.len(), 1);

    // Every inserted row is linked to the session
    let conn = db.conn().unwrap();
    let linked: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE import_session_id = ?",
            rusqlite::params![sessions[0].id],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(linked, 2);
}

#[test]
fn test_cmd_import_preview_writes_nothing() {
    let db = Database::in_memory().unwrap();
    let file = journal_file();

    let result = commands::cmd_import(&db, file.path(), None, true, &[]);
    assert!(result.is_ok());

    assert_eq!(db.count_transactions().unwrap(), 0);
    assert!(db.list_import_sessions(10).unwrap().is_empty());
}

#[test]
fn test_cmd_import_with_assignments() {
    let db = Database::in_memory().unwrap();
    let account = db.create_account("100", "Betriebskosten", "", None).unwrap();
    let file = journal_file();

    let assignments = vec![format!("0={}", account), "1=ignore".to_string()];
    commands::cmd_import(&db, file.path(), Some("lexware"), false, &assignments).unwrap();

    let transactions = db.list_transactions(10, 0).unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].assigned_account_id, Some(account));
}

#[test]
fn test_cmd_import_duplicate_assignment_rejected() {
    let db = Database::in_memory().unwrap();
    let file = journal_file();

    let assignments = vec!["0=ignore".to_string(), "0=5".to_string()];
    let result = commands::cmd_import(&db, file.path(), None, false, &assignments);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("assigned more than once"));
    assert_eq!(db.count_transactions().unwrap(), 0);
}

#[test]
fn test_cmd_import_unknown_format() {
    let db = Database::in_memory().unwrap();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"Date,Description,Amount\n2024-01-15,x,10\n")
        .unwrap();
    file.flush().unwrap();

    let result = commands::cmd_import(&db, file.path(), None, false, &[]);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("auto-detect"));
}

#[test]
fn test_cmd_sessions() {
    let db = Database::in_memory().unwrap();
    let file = journal_file();
    commands::cmd_import(&db, file.path(), None, false, &[]).unwrap();

    let result = commands::cmd_sessions(&db, 10);
    assert!(result.is_ok());
}

// ========== Transactions Command Tests ==========

#[test]
fn test_cmd_transactions_assign_and_void() {
    let db = Database::in_memory().unwrap();
    let file = journal_file();
    commands::cmd_import(&db, file.path(), None, false, &[]).unwrap();

    let account = db.create_account("100", "Betriebskosten", "", None).unwrap();
    let tx_id = db.list_transactions(10, 0).unwrap()[0].id;

    commands::cmd_transactions_assign(&db, tx_id, Some(account)).unwrap();
    assert_eq!(
        db.get_transaction(tx_id).unwrap().unwrap().assigned_account_id,
        Some(account)
    );

    commands::cmd_transactions_assign(&db, tx_id, None).unwrap();
    assert_eq!(
        db.get_transaction(tx_id).unwrap().unwrap().assigned_account_id,
        None
    );

    commands::cmd_transactions_void(&db, tx_id).unwrap();
    assert!(db.get_transaction(tx_id).unwrap().unwrap().voided);

    let result = commands::cmd_transactions_show(&db, tx_id, false);
    assert!(result.is_ok());
    let result = commands::cmd_transactions_show(&db, tx_id, true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_transactions_show_missing() {
    let db = Database::in_memory().unwrap();
    let result = commands::cmd_transactions_show(&db, 9999, false);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
}

// ========== Budgets Command Tests ==========

#[test]
fn test_cmd_budgets_flow() {
    let db = Database::in_memory().unwrap();

    commands::cmd_budgets_add(
        &db,
        "Haushalt 2024",
        "",
        Some("2024-01-01"),
        Some("2024-12-31"),
    )
    .unwrap();

    let budgets = db.list_budgets().unwrap();
    assert_eq!(budgets.len(), 1);
    let budget_id = budgets[0].id;

    commands::cmd_budgets_revise(&db, budget_id, "Entwurf", "").unwrap();
    commands::cmd_budgets_revise(&db, budget_id, "Beschluss", "").unwrap();

    let revisions = db.list_budget_revisions(budget_id).unwrap();
    assert_eq!(revisions.len(), 2);

    // Only the latest revision may be edited
    let result = commands::cmd_budgets_edit_revision(&db, revisions[0].id, "x", "");
    assert!(result.is_err());
    commands::cmd_budgets_edit_revision(&db, revisions[1].id, "Beschluss v2", "").unwrap();

    let result = commands::cmd_budgets_revisions(&db, budget_id);
    assert!(result.is_ok());

    commands::cmd_budgets_close(&db, budget_id).unwrap();
    assert!(db.get_budget(budget_id).unwrap().unwrap().is_closed);
}

#[test]
fn test_cmd_budgets_add_bad_date() {
    let db = Database::in_memory().unwrap();
    let result = commands::cmd_budgets_add(&db, "x", "", Some("01.01.2024"), None);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("--from"));
}
