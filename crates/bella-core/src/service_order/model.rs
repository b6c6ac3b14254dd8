//! Service order domain models.

use crate::customer::model::Customer;
use crate::error::{parse_stored, BellaError, BellaResult};
use crate::money;
use crate::order::model::OrderItem;
use bella_db::queries::service_orders::{ServiceOrderItemRow, ServiceOrderRow};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// A scheduled delivery or installation job for an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: Uuid,
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub status: ServiceOrderStatus,
    pub responsible: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<ServiceOrderItem>,
    pub order: OrderSummary,
    pub customer: Customer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderItem {
    pub id: Uuid,
    pub order_item_id: Option<Uuid>,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// The parts of the parent order a crew needs on site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: Uuid,
    pub code: String,
    pub delivery_date: Option<DateTime<Utc>>,
    pub items: Vec<OrderItem>,
}

impl ServiceOrder {
    pub fn from_rows(
        row: ServiceOrderRow,
        items: Vec<ServiceOrderItemRow>,
        order: OrderSummary,
        customer: Customer,
    ) -> BellaResult<Self> {
        Ok(Self {
            id: row.id,
            order_id: row.order_id,
            customer_id: row.customer_id,
            scheduled_date: row.scheduled_date,
            status: parse_stored("service_orders.status", &row.status)?,
            responsible: row.responsible,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            items: items
                .into_iter()
                .map(ServiceOrderItem::from_row)
                .collect::<BellaResult<_>>()?,
            order,
            customer,
        })
    }
}

impl ServiceOrderItem {
    pub fn from_row(row: ServiceOrderItemRow) -> BellaResult<Self> {
        Ok(Self {
            id: row.id,
            order_item_id: row.order_item_id,
            subtotal: money::line_total(row.quantity, row.unit_price)?,
            description: row.description,
            quantity: row.quantity,
            unit_price: row.unit_price,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceOrderStatus {
    #[default]
    Scheduled,
    InRoute,
    Delivered,
    Cancelled,
}

impl ServiceOrderStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InRoute => "in_route",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Label used by the API and the CLI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InRoute => "InRoute",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for ServiceOrderStatus {
    type Err = BellaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s.chars().filter(|c| *c != '_' && *c != '-').collect();
        match key.to_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "inroute" => Ok(Self::InRoute),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(BellaError::validation(format!(
                "Unknown service order status: {}",
                s
            ))),
        }
    }
}

/// A requested service-order line. With `order_item_id` set it copies an
/// order item (a blank description falls back to the source one); without
/// it the line is ad hoc and needs its own description.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderItemRequest {
    pub order_item_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(max = 250))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 2147483647))]
    pub quantity: i64,
    pub unit_price: Decimal,
}

/// Body of both create and update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderRequest {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub scheduled_date: NaiveDate,
    #[validate(length(max = 150))]
    pub responsible: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<ServiceOrderItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceOrderStatusRequest {
    pub status: ServiceOrderStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderQuery {
    pub customer_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub status: Option<ServiceOrderStatus>,
    pub scheduled_from: Option<NaiveDate>,
    pub scheduled_to: Option<NaiveDate>,
}
