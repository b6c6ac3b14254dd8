//! Expense domain models.

use crate::error::{parse_stored, BellaError, BellaResult};
use bella_db::queries::expenses::ExpenseRow;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// An operating expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub expense_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Expense {
    /// Create from database row.
    pub fn from_row(row: ExpenseRow) -> BellaResult<Self> {
        Ok(Self {
            id: row.id,
            description: row.description,
            amount: row.amount,
            category: parse_stored("expenses.category", &row.category)?,
            expense_date: row.expense_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Materials,
    Labor,
    Logistics,
    Utilities,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Materials => "materials",
            Self::Labor => "labor",
            Self::Logistics => "logistics",
            Self::Utilities => "utilities",
            Self::Other => "other",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = BellaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "materials" => Ok(Self::Materials),
            "labor" => Ok(Self::Labor),
            "logistics" => Ok(Self::Logistics),
            "utilities" => Ok(Self::Utilities),
            "other" => Ok(Self::Other),
            _ => Err(BellaError::validation(format!("Unknown expense category: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    #[validate(length(min = 1, max = 200))]
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub category: ExpenseCategory,
    pub expense_date: DateTime<Utc>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Filters for listing expenses. Date bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<ExpenseCategory>,
}
