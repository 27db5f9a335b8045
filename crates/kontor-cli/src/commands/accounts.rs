//! Budget account and transaction account command implementations

use anyhow::Result;
use kontor_core::Database;

pub fn cmd_accounts_list(db: &Database) -> Result<()> {
    let tree = db.account_tree()?;

    if tree.is_empty() {
        println!("No accounts yet. Add one with:");
        println!("  kontor accounts add 100 Verwaltung");
        return Ok(());
    }

    println!();
    println!("📁 Budget Accounts");
    println!("   ─────────────────────────────");

    for node in tree {
        let indent = "  ".repeat(node.depth);
        let account = &node.account;
        if account.description.is_empty() {
            println!("   {}{} {} (id {})", indent, account.code, account.name, account.id);
        } else {
            println!(
                "   {}{} {} (id {}) - {}",
                indent, account.code, account.name, account.id, account.description
            );
        }
    }

    println!();
    Ok(())
}

pub fn cmd_accounts_add(
    db: &Database,
    code: &str,
    name: &str,
    description: &str,
    parent: Option<i64>,
) -> Result<()> {
    let id = db.create_account(code, name, description, parent)?;
    println!("✅ Created account {} {} (id {})", code, name, id);
    Ok(())
}

pub fn cmd_accounts_update(
    db: &Database,
    id: i64,
    code: &str,
    name: &str,
    description: &str,
) -> Result<()> {
    db.update_account(id, code, name, description)?;
    println!("✅ Updated account {} ({} {})", id, code, name);
    Ok(())
}

pub fn cmd_accounts_set_parent(db: &Database, id: i64, parent: Option<i64>) -> Result<()> {
    db.set_account_parent(id, parent)?;
    match parent {
        Some(parent) => println!("✅ Moved account {} under {}", id, parent),
        None => println!("✅ Moved account {} to the root", id),
    }
    Ok(())
}

pub fn cmd_transaction_accounts_list(db: &Database) -> Result<()> {
    let accounts = db.list_transaction_accounts()?;

    if accounts.is_empty() {
        println!("No account codes yet. They are created automatically on import.");
        return Ok(());
    }

    println!();
    println!("🏦 Account Codes");
    println!("   ─────────────────────────────");

    for account in accounts {
        let name = if account.name.is_empty() {
            "(unnamed)"
        } else {
            &account.name
        };
        println!("   {:>8}  {}  (id {})", account.code, name, account.id);
    }

    println!();
    Ok(())
}

pub fn cmd_transaction_accounts_set(
    db: &Database,
    id: i64,
    name: &str,
    description: &str,
) -> Result<()> {
    db.update_transaction_account(id, name, description)?;
    println!("✅ Updated account code {} to {:?}", id, name);
    Ok(())
}
