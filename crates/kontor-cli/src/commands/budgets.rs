//! Budget and revision command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use kontor_core::Database;

fn parse_date(s: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    s.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .with_context(|| format!("Invalid {} date format (use YYYY-MM-DD)", flag))
}

pub fn cmd_budgets_list(db: &Database) -> Result<()> {
    let budgets = db.list_budgets()?;

    if budgets.is_empty() {
        println!("No budgets yet. Create one with:");
        println!("  kontor budgets add \"Haushalt 2024\" --from 2024-01-01 --to 2024-12-31");
        return Ok(());
    }

    println!();
    println!("📒 Budgets");
    println!("   ─────────────────────────────");

    for budget in budgets {
        let period = match (budget.period_start, budget.period_end) {
            (Some(from), Some(to)) => format!("{} .. {}", from, to),
            (Some(from), None) => format!("{} ..", from),
            (None, Some(to)) => format!(".. {}", to),
            (None, None) => "no period".to_string(),
        };
        let state = if budget.is_closed { " [closed]" } else { "" };
        println!("   #{:<4} {}  ({}){}", budget.id, budget.name, period, state);
    }

    println!();
    Ok(())
}

pub fn cmd_budgets_add(
    db: &Database,
    name: &str,
    description: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let period_start = parse_date(from, "--from")?;
    let period_end = parse_date(to, "--to")?;

    let id = db.create_budget(name, description, period_start, period_end)?;
    println!("✅ Created budget {:?} (id {})", name, id);
    println!("   Add a first revision: kontor budgets revise {} Entwurf", id);
    Ok(())
}

pub fn cmd_budgets_close(db: &Database, id: i64) -> Result<()> {
    db.close_budget(id)?;
    println!("✅ Closed budget {}", id);
    Ok(())
}

pub fn cmd_budgets_revisions(db: &Database, budget_id: i64) -> Result<()> {
    let budget = db
        .get_budget(budget_id)?
        .with_context(|| format!("Budget {} not found", budget_id))?;
    let revisions = db.list_budget_revisions(budget_id)?;

    println!();
    println!("📒 Revisions of {:?}", budget.name);
    println!("   ─────────────────────────────");

    if revisions.is_empty() {
        println!("   (none yet)");
    }

    let last = revisions.len().saturating_sub(1);
    for (i, revision) in revisions.iter().enumerate() {
        let state = if i == last { "editable" } else { "frozen" };
        println!(
            "   #{:<4} {}  {}  [{}]",
            revision.id,
            revision.created_at.format("%Y-%m-%d %H:%M"),
            revision.name,
            state,
        );
    }

    println!();
    Ok(())
}

pub fn cmd_budgets_revise(
    db: &Database,
    budget_id: i64,
    name: &str,
    description: &str,
) -> Result<()> {
    let id = db.create_budget_revision(budget_id, name, description)?;
    println!("✅ Added revision {:?} (id {}) to budget {}", name, id, budget_id);
    Ok(())
}

pub fn cmd_budgets_edit_revision(
    db: &Database,
    revision_id: i64,
    name: &str,
    description: &str,
) -> Result<()> {
    db.update_budget_revision(revision_id, name, description)?;
    println!("✅ Updated revision {} to {:?}", revision_id, name);
    Ok(())
}
