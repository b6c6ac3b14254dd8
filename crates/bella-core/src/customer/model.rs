//! Customer domain models.

use bella_db::queries::customers::CustomerRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A workshop customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Create from database row.
    pub fn from_row(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Fields accepted on create and update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(email, length(max = 150))]
    pub email: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
}

impl CustomerInput {
    pub(crate) fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: crate::text::optional(self.email),
            phone: crate::text::optional(self.phone),
            address: crate::text::optional(self.address),
        }
    }
}
