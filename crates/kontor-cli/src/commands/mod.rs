//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `accounts` - Budget account hierarchy and transaction account codes
//! - `budgets` - Budget and revision commands
//! - `core` - Core commands (init, status) and shared utilities (open_db)
//! - `import` - Journal import commands (preview, import, sessions)
//! - `transactions` - Transaction commands (list, show, assign, void)

pub mod accounts;
pub mod budgets;
pub mod core;
pub mod import;
pub mod transactions;

// Re-export command functions for main.rs
pub use accounts::*;
pub use budgets::*;
pub use core::*;
pub use import::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
