//! Posting entity
//!
//! A posting is one dated ledger event (a purchase, a paycheck, a
//! transfer) grouping the transaction lines that make it up. Posting
//! numbers are caller-supplied and never reassigned.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;
use super::validate::{optional_name, ValidationErrors};

/// Closed set of posting kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingType {
    Standard,
    Income,
    Transfer,
}

impl PostingType {
    pub const ALL: [PostingType; 3] = [
        PostingType::Standard,
        PostingType::Income,
        PostingType::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostingType::Standard => "standard",
            PostingType::Income => "income",
            PostingType::Transfer => "transfer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "standard" => Some(PostingType::Standard),
            "income" => Some(PostingType::Income),
            "transfer" => Some(PostingType::Transfer),
            _ => None,
        }
    }
}

impl Default for PostingType {
    fn default() -> Self {
        PostingType::Standard
    }
}

impl std::fmt::Display for PostingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored posting with its transaction lines embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    pub posting_number: i64,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub posting_type: PostingType,
    pub payee: String,
    pub cleared: bool,
    pub note: String,
    pub transactions: Vec<Transaction>,
}

/// Validated payload for creating a posting, defaults applied.
#[derive(Debug, Clone)]
pub struct NewPosting {
    pub posting_number: i64,
    pub date: NaiveDate,
    pub posting_type: PostingType,
    pub payee: String,
    pub cleared: bool,
    pub note: String,
}

impl NewPosting {
    /// Validate raw create input. `posting_number` is required and must be
    /// positive; everything else falls back to its default (`today` for the
    /// date, `standard`, blank payee and note, not cleared).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        posting_number: Option<i64>,
        date: Option<NaiveDate>,
        posting_type: Option<String>,
        payee: Option<String>,
        cleared: Option<bool>,
        note: Option<String>,
        today: NaiveDate,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let posting_number = match posting_number {
            Some(number) if number > 0 => Some(number),
            Some(_) => {
                errors.add("postingNumber", "Must be greater than 0");
                None
            }
            None => {
                errors.add("postingNumber", "This field is required");
                None
            }
        };

        let posting_type = match posting_type {
            Some(value) => parse_type(&mut errors, &value),
            None => Some(PostingType::default()),
        };

        let payee = match payee {
            Some(value) => optional_name(&mut errors, "payee", &value),
            None => Some(String::new()),
        };

        match (posting_number, posting_type, payee) {
            (Some(posting_number), Some(posting_type), Some(payee)) => Ok(Self {
                posting_number,
                date: date.unwrap_or(today),
                posting_type,
                payee,
                cleared: cleared.unwrap_or(false),
                note: note.map(|n| n.trim().to_string()).unwrap_or_default(),
            }),
            _ => Err(errors),
        }
    }
}

/// Changes for a posting update. The posting number itself is not part of
/// the change set: it is write-once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostingChanges {
    pub date: Option<NaiveDate>,
    pub posting_type: Option<PostingType>,
    pub payee: Option<String>,
    pub cleared: Option<bool>,
    pub note: Option<String>,
}

impl PostingChanges {
    /// Validate update input. Every posting field has a default, so full
    /// and partial updates validate identically: supplied fields change,
    /// absent fields stay.
    pub fn patch(
        date: Option<NaiveDate>,
        posting_type: Option<String>,
        payee: Option<String>,
        cleared: Option<bool>,
        note: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let posting_type = match posting_type {
            Some(value) => parse_type(&mut errors, &value),
            None => None,
        };
        let payee = match payee {
            Some(value) => optional_name(&mut errors, "payee", &value),
            None => None,
        };

        if errors.is_empty() {
            Ok(Self {
                date,
                posting_type,
                payee,
                cleared,
                note: note.map(|n| n.trim().to_string()),
            })
        } else {
            Err(errors)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.posting_type.is_none()
            && self.payee.is_none()
            && self.cleared.is_none()
            && self.note.is_none()
    }
}

fn parse_type(errors: &mut ValidationErrors, value: &str) -> Option<PostingType> {
    match PostingType::from_str(value) {
        Some(posting_type) => Some(posting_type),
        None => {
            errors.add("type", format!("\"{value}\" is not a valid posting type"));
            None
        }
    }
}
