//! Storage module
//!
//! Per-entity data access over the shared SQLite pool. Every operation
//! runs inside a single transaction; uniqueness and existence pre-checks
//! produce the friendly field errors, while the schema constraints stay on
//! as the backstop for writes that race past them.

mod accounts;
mod budgets;
mod categories;
mod postings;
mod transactions;

pub use accounts::AccountStore;
pub use budgets::BudgetStore;
pub use categories::CategoryStore;
pub use postings::PostingStore;
pub use transactions::TransactionStore;

/// "1 transaction", "3 budgets"
pub(crate) fn count_noun(count: i64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
