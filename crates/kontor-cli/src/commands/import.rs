//! Journal import command implementations

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use kontor_core::import::{detect_import_type, parse_rows};
use kontor_core::{Database, ImportType, Importer, RowAssignment};

use super::truncate;

/// Parse one `--assign ROW=ACCOUNT` argument.
///
/// `ROW` is a 0-based row index; the value is a budget account ID or the
/// word "ignore".
pub fn parse_assignment(s: &str) -> Result<(usize, RowAssignment)> {
    let (row_str, value) = s
        .split_once('=')
        .with_context(|| format!("Invalid assignment {:?} (expected ROW=ACCOUNT or ROW=ignore)", s))?;

    let row: usize = row_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid row index in assignment {:?}", s))?;

    let value = value.trim();
    if value.eq_ignore_ascii_case("ignore") {
        return Ok((row, RowAssignment::Ignore));
    }

    let account_id: i64 = value
        .parse()
        .with_context(|| format!("Invalid account ID in assignment {:?}", s))?;
    Ok((row, RowAssignment::Account(account_id)))
}

fn collect_assignments(raw: &[String]) -> Result<HashMap<usize, RowAssignment>> {
    let mut assignments = HashMap::new();
    for s in raw {
        let (row, assignment) = parse_assignment(s)?;
        if assignments.insert(row, assignment).is_some() {
            anyhow::bail!("Row {} is assigned more than once", row);
        }
    }
    Ok(assignments)
}

/// Determine the import format, from --type or from the file header
fn resolve_import_type(file: &Path, type_str: Option<&str>) -> Result<ImportType> {
    if let Some(type_str) = type_str {
        return type_str
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e));
    }

    let f = File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let mut header_line = String::new();
    BufReader::new(f)
        .read_line(&mut header_line)
        .context("Failed to read file header")?;

    detect_import_type(&header_line).ok_or_else(|| {
        anyhow::anyhow!(
            "Could not auto-detect the import format from the file header.\n\
             Specify --type lexware"
        )
    })
}

pub fn cmd_import(
    db: &Database,
    file: &Path,
    type_str: Option<&str>,
    preview: bool,
    raw_assignments: &[String],
) -> Result<()> {
    let import_type = resolve_import_type(file, type_str)?;

    if preview {
        return cmd_import_preview(file, import_type);
    }

    let assignments = collect_assignments(raw_assignments)?;

    let filename = file.file_name().and_then(|n| n.to_str());
    println!("📥 Importing {} from {}...", import_type, file.display());

    let f = File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let importer = Importer::new(db);
    let summary = importer.import(f, import_type, filename, &assignments)?;

    println!("✅ Import complete! (session {})", summary.session_id);
    println!("   Imported: {}", summary.imported);
    println!("   Skipped (duplicates): {}", summary.skipped_duplicates);
    if summary.ignored > 0 {
        println!("   Ignored: {}", summary.ignored);
    }

    // Surface codes that still need a display name
    let unnamed: Vec<_> = summary.accounts.iter().filter(|a| a.name.is_empty()).collect();
    if !unnamed.is_empty() {
        println!();
        println!("   Account codes without a name:");
        for account in unnamed {
            println!("   - {} (id {})", account.code, account.id);
        }
        println!("   Name them with: kontor transaction-accounts set <ID> <NAME>");
    }

    Ok(())
}

fn cmd_import_preview(file: &Path, import_type: ImportType) -> Result<()> {
    let f = File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let rows = parse_rows(f, import_type)?;

    println!("🔎 Preview of {} ({} rows, nothing written)", file.display(), rows.len());
    println!();
    println!("   {:>4}  {:10}  {:>12}  {:>8}  {:>8}  Buchungstext", "Row", "Datum", "Betrag", "Soll", "Haben");
    println!("   ─────────────────────────────────────────────────────────────");

    for (i, row) in rows.iter().enumerate() {
        println!(
            "   {:>4}  {:10}  {:>12}  {:>8}  {:>8}  {}",
            i,
            row.booked_at,
            row.amount,
            row.debit_account_code,
            row.credit_account_code,
            truncate(&row.description, 40)
        );
    }

    println!();
    println!("   Import with: kontor import --file {} [--assign ROW=ACCOUNT]", file.display());

    Ok(())
}

pub fn cmd_sessions(db: &Database, limit: i64) -> Result<()> {
    let sessions = db.list_import_sessions(limit)?;

    if sessions.is_empty() {
        println!("No imports yet. Import a journal with:");
        println!("  kontor import --file journal.csv");
        return Ok(());
    }

    println!();
    println!("📜 Import History");
    println!("   ─────────────────────────────────────────────────────────────");

    for session in sessions {
        println!(
            "   #{:<4} {}  {}  imported {}  skipped {}  ignored {}  {}",
            session.id,
            session.created_at.format("%Y-%m-%d %H:%M"),
            session.import_type,
            session.imported_count,
            session.skipped_count,
            session.ignored_count,
            session.filename.as_deref().unwrap_or("-"),
        );
    }

    println!();
    Ok(())
}
