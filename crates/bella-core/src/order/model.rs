//! Sales order domain models.

use crate::error::{parse_stored, BellaError, BellaResult};
use crate::money;
use bella_db::queries::orders::{OrderItemRow, OrderRow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// A customer sales order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub code: String,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub delivery_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItem>,
}

/// A line of an order. Description and price are copied at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl Order {
    /// Create from database rows.
    pub fn from_rows(row: OrderRow, items: Vec<OrderItemRow>) -> BellaResult<Self> {
        Ok(Self {
            id: row.id,
            code: row.code,
            customer_id: row.customer_id,
            status: parse_stored("orders.status", &row.status)?,
            total_amount: row.total_amount,
            delivery_date: row.delivery_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
            items: items
                .into_iter()
                .map(OrderItem::from_row)
                .collect::<BellaResult<_>>()?,
        })
    }

    /// Date the order counts towards in the financial summary.
    pub fn accounting_date(&self) -> DateTime<Utc> {
        self.delivery_date.unwrap_or(self.created_at)
    }
}

impl OrderItem {
    pub fn from_row(row: OrderItemRow) -> BellaResult<Self> {
        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            subtotal: money::line_total(row.quantity, row.unit_price)?,
            description: row.description,
            quantity: row.quantity,
            unit_price: row.unit_price,
        })
    }
}

/// Order lifecycle status. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    InProduction,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        Self::Pending,
        Self::InProduction,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProduction => "in_production",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = BellaError;

    /// Accepts the storage form (`in_production`) and the API form
    /// (`InProduction`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s.chars().filter(|c| *c != '_' && *c != '-').collect();
        match key.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "inproduction" => Ok(Self::InProduction),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(BellaError::validation(format!("Unknown order status: {}", s))),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::InProduction => "InProduction",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// One requested order line.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Option<Uuid>,
    #[validate(length(min = 1, max = 250))]
    pub description: String,
    #[validate(range(min = 1, max = 2147483647))]
    pub quantity: i64,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    #[validate(length(max = 30))]
    pub code: Option<String>,
    pub delivery_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "An order must contain at least one item."))]
    #[validate(nested)]
    pub items: Vec<OrderItemRequest>,
}

/// Full replacement of an order's mutable state. The customer is fixed at
/// creation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[validate(length(max = 30))]
    pub code: Option<String>,
    pub status: OrderStatus,
    pub delivery_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "An order must contain at least one item."))]
    #[validate(nested)]
    pub items: Vec<OrderItemRequest>,
}

/// Filters for listing orders. Date bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub customer_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

pub(crate) fn normalize_items(items: Vec<OrderItemRequest>) -> Vec<OrderItemRequest> {
    items
        .into_iter()
        .map(|item| OrderItemRequest {
            description: item.description.trim().to_string(),
            ..item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_accepts_both_forms() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_in_pascal_case() {
        let json = serde_json::to_string(&OrderStatus::InProduction).unwrap();
        assert_eq!(json, "\"InProduction\"");
    }
}
