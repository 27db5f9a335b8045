//! Transaction command implementations

use anyhow::{Context, Result};
use kontor_core::Database;

use super::truncate;

pub fn cmd_transactions_list(db: &Database, limit: i64, offset: i64) -> Result<()> {
    let transactions = db.list_transactions(limit, offset)?;

    if transactions.is_empty() {
        println!("No transactions found. Import a journal with:");
        println!("  kontor import --file journal.csv");
        return Ok(());
    }

    println!();
    println!("💳 Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for t in transactions {
        let assigned = t.assigned_account_name.as_deref().unwrap_or("-");
        let flag = if t.voided { " [void]" } else { "" };
        println!(
            "   #{:<5} {}  {:>12}  {:>6}/{:<6}  {:20}  {}{}",
            t.id,
            t.booked_at,
            t.amount,
            t.debit_account_code,
            t.credit_account_code,
            truncate(assigned, 20),
            truncate(&t.description, 40),
            flag,
        );
    }

    println!();
    Ok(())
}

pub fn cmd_transactions_show(db: &Database, id: i64, json: bool) -> Result<()> {
    let t = db
        .get_transaction(id)?
        .with_context(|| format!("Transaction {} not found", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&t)?);
        return Ok(());
    }

    println!();
    println!("💳 Transaction #{}", t.id);
    println!("   ─────────────────────────────");
    println!("   Date: {}", t.booked_at);
    println!("   Amount: {}", t.amount);
    println!("   Description: {}", t.description);
    println!("   Debit: {} (id {})", t.debit_account_code, t.debit_account_id);
    println!("   Credit: {} (id {})", t.credit_account_code, t.credit_account_id);
    match (t.assigned_account_id, t.assigned_account_name.as_deref()) {
        (Some(account_id), Some(name)) => println!("   Assigned: {} (id {})", name, account_id),
        (Some(account_id), None) => println!("   Assigned: id {}", account_id),
        _ => println!("   Assigned: -"),
    }
    println!("   Voided: {}", if t.voided { "yes" } else { "no" });
    println!("   Hash: {}", t.content_hash);
    println!();

    Ok(())
}

pub fn cmd_transactions_assign(
    db: &Database,
    transaction_id: i64,
    account_id: Option<i64>,
) -> Result<()> {
    db.assign_transaction_account(transaction_id, account_id)?;
    match account_id {
        Some(account_id) => println!(
            "✅ Assigned transaction {} to account {}",
            transaction_id, account_id
        ),
        None => println!("✅ Cleared assignment of transaction {}", transaction_id),
    }
    Ok(())
}

pub fn cmd_transactions_void(db: &Database, id: i64) -> Result<()> {
    db.void_transaction(id)?;
    println!("✅ Voided transaction {} (kept for audit)", id);
    Ok(())
}
