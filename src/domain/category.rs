//! Category entity
//!
//! Spending categories referenced by transactions and budgets.

use chrono::NaiveDate;
use serde::Serialize;

use super::validate::{required_name, ValidationErrors};

/// A stored category. `created_date` is write-once, as for accounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_date: NaiveDate,
}

/// Validated payload for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn new(name: Option<String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = match name {
            Some(value) => required_name(&mut errors, "name", &value),
            None => {
                errors.add("name", "This field is required");
                None
            }
        };

        match name {
            Some(name) => Ok(Self { name }),
            None => Err(errors),
        }
    }
}

/// Changes for a category update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChanges {
    pub name: Option<String>,
}

impl CategoryChanges {
    /// Validate a partial update: the name is only checked when supplied.
    pub fn patch(name: Option<String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = match name {
            Some(value) => required_name(&mut errors, "name", &value),
            None => None,
        };

        if errors.is_empty() {
            Ok(Self { name })
        } else {
            Err(errors)
        }
    }

    /// Validate a full update: the name must be present.
    pub fn replace(name: Option<String>) -> Result<Self, ValidationErrors> {
        match name {
            Some(_) => Self::patch(name),
            None => Err(ValidationErrors::single("name", "This field is required")),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_valid() {
        let category = NewCategory::new(Some("Groceries".into())).unwrap();
        assert_eq!(category.name, "Groceries");
    }

    #[test]
    fn test_new_category_requires_name() {
        let errors = NewCategory::new(None).unwrap_err();
        assert_eq!(errors.fields()["name"], vec!["This field is required"]);
    }

    #[test]
    fn test_new_category_rejects_long_name() {
        let errors = NewCategory::new(Some("x".repeat(100))).unwrap_err();
        assert_eq!(errors.fields()["name"], vec!["Must be 50 characters or fewer"]);
    }

    #[test]
    fn test_replace_requires_name() {
        let errors = CategoryChanges::replace(None).unwrap_err();
        assert_eq!(errors.fields()["name"], vec!["This field is required"]);
    }

    #[test]
    fn test_patch_without_name_is_empty() {
        let changes = CategoryChanges::patch(None).unwrap();
        assert!(changes.is_empty());
    }
}
