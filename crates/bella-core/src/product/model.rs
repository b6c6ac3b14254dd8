//! Product catalog domain models.

use bella_db::queries::products::{ProductPartRow, ProductRow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A catalog product with its bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub default_sale_price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub parts: Vec<ProductPart>,
}

/// One line of a product's bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPart {
    pub id: Uuid,
    pub name: String,
    pub measurements: Option<String>,
    pub quantity: i64,
}

impl Product {
    /// Create from database rows.
    pub fn from_rows(row: ProductRow, parts: Vec<ProductPartRow>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            default_sale_price: row.default_sale_price,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            parts: parts.into_iter().map(ProductPart::from_row).collect(),
        }
    }
}

impl ProductPart {
    pub fn from_row(row: ProductPartRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            measurements: row.measurements,
            quantity: row.quantity,
        }
    }
}

fn default_active() -> bool {
    true
}

/// Fields accepted on create and update. Parts replace the stored ones.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default)]
    pub default_sale_price: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[validate(length(min = 1, message = "Produto deve ter ao menos uma peça"))]
    #[validate(nested)]
    pub parts: Vec<ProductPartInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPartInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub measurements: Option<String>,
    #[validate(range(min = 1, max = 2147483647))]
    pub quantity: i64,
}

impl ProductInput {
    pub(crate) fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: crate::text::optional(self.description),
            parts: self
                .parts
                .into_iter()
                .map(|p| ProductPartInput {
                    name: p.name.trim().to_string(),
                    measurements: crate::text::optional(p.measurements),
                    quantity: p.quantity,
                })
                .collect(),
            default_sale_price: self.default_sale_price,
            is_active: self.is_active,
        }
    }
}
