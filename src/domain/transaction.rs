//! Transaction entity
//!
//! One line item within a posting: an amount assigned to an account and a
//! category. Reads embed the related account and category; writes refer to
//! them by id.

use rust_decimal::Decimal;
use serde::Serialize;

use super::account::Account;
use super::amount::Amount;
use super::category::Category;
use super::validate::ValidationErrors;

/// A stored transaction line, related rows embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub posting_number: i64,
    pub account: Account,
    pub category: Category,
    pub amount: Amount,
    pub note: String,
}

/// Validated payload for creating a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub posting_number: i64,
    pub account_id: i64,
    pub category_id: i64,
    pub amount: Amount,
    pub note: String,
}

impl NewTransaction {
    /// Validate raw create input. The three references and the amount are
    /// required; whether the referenced rows exist is checked at write time.
    pub fn new(
        posting_number: Option<i64>,
        account_id: Option<i64>,
        category_id: Option<i64>,
        amount: Option<Decimal>,
        note: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let posting_number = require(&mut errors, "postingNumber", posting_number);
        let account_id = require(&mut errors, "accountId", account_id);
        let category_id = require(&mut errors, "categoryId", category_id);
        let amount = match amount {
            Some(value) => parse_amount(&mut errors, value),
            None => {
                errors.add("amount", "This field is required");
                None
            }
        };

        match (posting_number, account_id, category_id, amount) {
            (Some(posting_number), Some(account_id), Some(category_id), Some(amount)) => Ok(Self {
                posting_number,
                account_id,
                category_id,
                amount,
                note: note.map(|n| n.trim().to_string()).unwrap_or_default(),
            }),
            _ => Err(errors),
        }
    }
}

/// Changes for a transaction update. Unlike a posting's own number, the
/// posting a transaction belongs to may be reassigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    pub posting_number: Option<i64>,
    pub account_id: Option<i64>,
    pub category_id: Option<i64>,
    pub amount: Option<Amount>,
    pub note: Option<String>,
}

impl TransactionChanges {
    /// Validate a partial update: only supplied fields are checked.
    pub fn patch(
        posting_number: Option<i64>,
        account_id: Option<i64>,
        category_id: Option<i64>,
        amount: Option<Decimal>,
        note: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let amount = match amount {
            Some(value) => parse_amount(&mut errors, value),
            None => None,
        };

        if errors.is_empty() {
            Ok(Self {
                posting_number,
                account_id,
                category_id,
                amount,
                note: note.map(|n| n.trim().to_string()),
            })
        } else {
            Err(errors)
        }
    }

    /// Validate a full update: the references and the amount must all be
    /// present.
    pub fn replace(
        posting_number: Option<i64>,
        account_id: Option<i64>,
        category_id: Option<i64>,
        amount: Option<Decimal>,
        note: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, missing) in [
            ("postingNumber", posting_number.is_none()),
            ("accountId", account_id.is_none()),
            ("categoryId", category_id.is_none()),
            ("amount", amount.is_none()),
        ] {
            if missing {
                errors.add(field, "This field is required");
            }
        }

        match (
            Self::patch(posting_number, account_id, category_id, amount, note),
            errors.is_empty(),
        ) {
            (Ok(changes), true) => Ok(changes),
            (Ok(_), false) => Err(errors),
            (Err(patch_errors), _) => {
                errors.merge(patch_errors);
                Err(errors)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.posting_number.is_none()
            && self.account_id.is_none()
            && self.category_id.is_none()
            && self.amount.is_none()
            && self.note.is_none()
    }
}

fn require(errors: &mut ValidationErrors, field: &str, value: Option<i64>) -> Option<i64> {
    if value.is_none() {
        errors.add(field, "This field is required");
    }
    value
}

fn parse_amount(errors: &mut ValidationErrors, value: Decimal) -> Option<Amount> {
    match Amount::new(value) {
        Ok(amount) => Some(amount),
        Err(err) => {
            errors.add("amount", err.to_string());
            None
        }
    }
}
