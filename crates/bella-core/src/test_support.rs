//! Fixtures shared by the service tests.

use crate::clock::SystemClock;
use crate::customer::{self, model::{Customer, CustomerInput}};
use crate::order::model::OrderItemRequest;
use crate::product::model::{ProductInput, ProductPartInput};
use bella_db::migrations::run_migrations;
use bella_db::DbPool;
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn pool() -> DbPool {
    let pool = DbPool::in_memory().unwrap();
    run_migrations(&pool).unwrap();
    pool
}

pub fn customer(pool: &DbPool, name: &str) -> Customer {
    customer::create_customer(
        pool,
        &SystemClock,
        CustomerInput {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .unwrap()
}

pub fn product_input(name: &str, parts: &[(&str, i64)]) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: None,
        default_sale_price: Decimal::new(150000, 2),
        is_active: true,
        parts: parts
            .iter()
            .map(|(part, quantity)| ProductPartInput {
                name: part.to_string(),
                measurements: None,
                quantity: *quantity,
            })
            .collect(),
    }
}

pub fn item(description: &str, quantity: i64, unit_price: Decimal) -> OrderItemRequest {
    OrderItemRequest {
        product_id: None,
        description: description.to_string(),
        quantity,
        unit_price,
    }
}

pub fn linked_item(
    product_id: Uuid,
    description: &str,
    quantity: i64,
    unit_price: Decimal,
) -> OrderItemRequest {
    OrderItemRequest {
        product_id: Some(product_id),
        ..item(description, quantity, unit_price)
    }
}
