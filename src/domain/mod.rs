//! Domain module
//!
//! Core ledger types and their validation rules. Everything here is pure:
//! construction either yields a valid value or a set of field errors.

pub mod account;
pub mod amount;
pub mod budget;
pub mod category;
pub mod posting;
pub mod transaction;
pub mod validate;

pub use account::{Account, AccountChanges, AccountType, NewAccount};
pub use amount::{Amount, AmountError};
pub use budget::{default_month, default_year, Budget, BudgetChanges, NewBudget};
pub use category::{Category, CategoryChanges, NewCategory};
pub use posting::{NewPosting, Posting, PostingChanges, PostingType};
pub use transaction::{NewTransaction, Transaction, TransactionChanges};
pub use validate::ValidationErrors;
