//! Account entity
//!
//! An account is somewhere money lives: a bank account, a card, a cash
//! envelope. Names are unique across the ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validate::{required_name, ValidationErrors};

/// Closed set of account kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
    Cash,
    CreditCard,
    LineOfCredit,
    Investment,
    OtherLiability,
    OtherAsset,
}

impl AccountType {
    pub const ALL: [AccountType; 8] = [
        AccountType::Checking,
        AccountType::Savings,
        AccountType::Cash,
        AccountType::CreditCard,
        AccountType::LineOfCredit,
        AccountType::Investment,
        AccountType::OtherLiability,
        AccountType::OtherAsset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Cash => "cash",
            AccountType::CreditCard => "credit_card",
            AccountType::LineOfCredit => "line_of_credit",
            AccountType::Investment => "investment",
            AccountType::OtherLiability => "other_liability",
            AccountType::OtherAsset => "other_asset",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "checking" => Some(AccountType::Checking),
            "savings" => Some(AccountType::Savings),
            "cash" => Some(AccountType::Cash),
            "credit_card" => Some(AccountType::CreditCard),
            "line_of_credit" => Some(AccountType::LineOfCredit),
            "investment" => Some(AccountType::Investment),
            "other_liability" => Some(AccountType::OtherLiability),
            "other_asset" => Some(AccountType::OtherAsset),
            _ => None,
        }
    }
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Cash
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored account. `created_date` is set once at creation and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub created_date: NaiveDate,
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

/// Validated payload for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub account_type: AccountType,
}

impl NewAccount {
    /// Validate raw create input. `name` is required; `account_type`
    /// defaults to [`AccountType::Cash`] when absent.
    pub fn new(name: Option<String>, account_type: Option<String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = match name {
            Some(value) => required_name(&mut errors, "name", &value),
            None => {
                errors.add("name", "This field is required");
                None
            }
        };

        let account_type = match account_type {
            Some(value) => parse_type(&mut errors, &value),
            None => Some(AccountType::default()),
        };

        match (name, account_type) {
            (Some(name), Some(account_type)) => Ok(Self { name, account_type }),
            _ => Err(errors),
        }
    }
}

/// Field-by-field changes for an account update. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
}

impl AccountChanges {
    /// Validate a partial update: only supplied fields are checked.
    pub fn patch(name: Option<String>, account_type: Option<String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = match name {
            Some(value) => required_name(&mut errors, "name", &value),
            None => None,
        };
        let account_type = match account_type {
            Some(value) => parse_type(&mut errors, &value),
            None => None,
        };

        if errors.is_empty() {
            Ok(Self { name, account_type })
        } else {
            Err(errors)
        }
    }

    /// Validate a full update: as [`patch`](Self::patch), but `name` must be
    /// present.
    pub fn replace(name: Option<String>, account_type: Option<String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if name.is_none() {
            errors.add("name", "This field is required");
        }

        match (Self::patch(name, account_type), errors.is_empty()) {
            (Ok(changes), true) => Ok(changes),
            (Ok(_), false) => Err(errors),
            (Err(patch_errors), _) => {
                errors.merge(patch_errors);
                Err(errors)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.account_type.is_none()
    }
}

fn parse_type(errors: &mut ValidationErrors, value: &str) -> Option<AccountType> {
    match AccountType::from_str(value) {
        Some(account_type) => Some(account_type),
        None => {
            errors.add("type", format!("\"{value}\" is not a valid account type"));
            None
        }
    }
}
