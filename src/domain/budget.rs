//! Budget entity
//!
//! A spending target for one category in one month. New budgets default to
//! the month being planned for: early in a month that is still the current
//! month, past the first week it rolls to the next one.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::amount::Amount;
use super::category::Category;
use super::validate::ValidationErrors;

/// Default budget month for `today`: the current month through day 7, the
/// following month afterwards (December wraps to January).
pub fn default_month(today: NaiveDate) -> u32 {
    if today.day() > 7 {
        if today.month() == 12 {
            1
        } else {
            today.month() + 1
        }
    } else {
        today.month()
    }
}

/// Default budget year for `today`: the current year, advancing only when
/// [`default_month`] wraps past December.
pub fn default_year(today: NaiveDate) -> i32 {
    if today.day() > 7 && today.month() == 12 {
        today.year() + 1
    } else {
        today.year()
    }
}

/// A stored budget, its category embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: i64,
    pub month: u32,
    pub year: i32,
    pub category: Category,
    pub amount: Amount,
}

/// Validated payload for creating a budget, defaults applied.
#[derive(Debug, Clone)]
pub struct NewBudget {
    pub month: u32,
    pub year: i32,
    pub category_id: i64,
    pub amount: Amount,
}

impl NewBudget {
    /// Validate raw create input. `category_id` and `amount` are required;
    /// `month` and `year` fall back to the rolling defaults for `today`.
    pub fn new(
        month: Option<i64>,
        year: Option<i32>,
        category_id: Option<i64>,
        amount: Option<Decimal>,
        today: NaiveDate,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let month = match month {
            Some(value) => parse_month(&mut errors, value),
            None => Some(default_month(today)),
        };
        let category_id = match category_id {
            Some(id) => Some(id),
            None => {
                errors.add("categoryId", "This field is required");
                None
            }
        };
        let amount = match amount {
            Some(value) => parse_amount(&mut errors, value),
            None => {
                errors.add("amount", "This field is required");
                None
            }
        };

        match (month, category_id, amount) {
            (Some(month), Some(category_id), Some(amount)) => Ok(Self {
                month,
                year: year.unwrap_or_else(|| default_year(today)),
                category_id,
                amount,
            }),
            _ => Err(errors),
        }
    }
}

/// Changes for a budget update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetChanges {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub category_id: Option<i64>,
    pub amount: Option<Amount>,
}

impl BudgetChanges {
    /// Validate a partial update: only supplied fields are checked.
    pub fn patch(
        month: Option<i64>,
        year: Option<i32>,
        category_id: Option<i64>,
        amount: Option<Decimal>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let month = match month {
            Some(value) => parse_month(&mut errors, value),
            None => None,
        };
        let amount = match amount {
            Some(value) => parse_amount(&mut errors, value),
            None => None,
        };

        if errors.is_empty() {
            Ok(Self {
                month,
                year,
                category_id,
                amount,
            })
        } else {
            Err(errors)
        }
    }

    /// Validate a full update: `category_id` and `amount` must be present;
    /// `month` and `year` keep their stored values when absent.
    pub fn replace(
        month: Option<i64>,
        year: Option<i32>,
        category_id: Option<i64>,
        amount: Option<Decimal>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if category_id.is_none() {
            errors.add("categoryId", "This field is required");
        }
        if amount.is_none() {
            errors.add("amount", "This field is required");
        }

        match (Self::patch(month, year, category_id, amount), errors.is_empty()) {
            (Ok(changes), true) => Ok(changes),
            (Ok(_), false) => Err(errors),
            (Err(patch_errors), _) => {
                errors.merge(patch_errors);
                Err(errors)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.month.is_none()
            && self.year.is_none()
            && self.category_id.is_none()
            && self.amount.is_none()
    }
}

fn parse_month(errors: &mut ValidationErrors, value: i64) -> Option<u32> {
    if (1..=12).contains(&value) {
        Some(value as u32)
    } else {
        errors.add("month", "Must be between 1 and 12");
        None
    }
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
