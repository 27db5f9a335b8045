//! Kontor CLI - Budget administration tool
//!
//! Usage:
//!   kontor init                     Initialize database
//!   kontor import --file CSV        Import a journal export
//!   kontor accounts                 Show the budget account tree
//!   kontor transactions list        List imported transactions

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Import {
            file,
            import_type,
            preview,
            assignments,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_import(&db, &file, import_type.as_deref(), preview, &assignments)
        }
        Commands::Accounts { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(AccountsAction::List) => commands::cmd_accounts_list(&db),
                Some(AccountsAction::Add {
                    code,
                    name,
                    description,
                    parent,
                }) => commands::cmd_accounts_add(&db, &code, &name, &description, parent),
                Some(AccountsAction::Update {
                    id,
                    code,
                    name,
                    description,
                }) => commands::cmd_accounts_update(&db, id, &code, &name, &description),
                Some(AccountsAction::SetParent { id, parent }) => {
                    commands::cmd_accounts_set_parent(&db, id, parent)
                }
            }
        }
        Commands::TransactionAccounts { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(TransactionAccountsAction::List) => {
                    commands::cmd_transaction_accounts_list(&db)
                }
                Some(TransactionAccountsAction::Set {
                    id,
                    name,
                    description,
                }) => commands::cmd_transaction_accounts_set(&db, id, &name, &description),
            }
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_transactions_list(&db, 20, 0),
                Some(TransactionsAction::List { limit, offset }) => {
                    commands::cmd_transactions_list(&db, limit, offset)
                }
                Some(TransactionsAction::Show { id, json }) => {
                    commands::cmd_transactions_show(&db, id, json)
                }
                Some(TransactionsAction::Assign {
                    transaction_id,
                    account_id,
                }) => commands::cmd_transactions_assign(&db, transaction_id, Some(account_id)),
                Some(TransactionsAction::Unassign { transaction_id }) => {
                    commands::cmd_transactions_assign(&db, transaction_id, None)
                }
                Some(TransactionsAction::Void { id }) => commands::cmd_transactions_void(&db, id),
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(BudgetsAction::List) => commands::cmd_budgets_list(&db),
                Some(BudgetsAction::Add {
                    name,
                    description,
                    from,
                    to,
                }) => commands::cmd_budgets_add(
                    &db,
                    &name,
                    &description,
                    from.as_deref(),
                    to.as_deref(),
                ),
                Some(BudgetsAction::Close { id }) => commands::cmd_budgets_close(&db, id),
                Some(BudgetsAction::Revisions { budget_id }) => {
                    commands::cmd_budgets_revisions(&db, budget_id)
                }
                Some(BudgetsAction::Revise {
                    budget_id,
                    name,
                    description,
                }) => commands::cmd_budgets_revise(&db, budget_id, &name, &description),
                Some(BudgetsAction::EditRevision {
                    id,
                    name,
                    description,
                }) => commands::cmd_budgets_edit_revision(&db, id, &name, &description),
            }
        }
        Commands::Sessions { limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_sessions(&db, limit)
        }
    }
}
