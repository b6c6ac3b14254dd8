//! Customer registry.

pub mod model;

use crate::clock::Clock;
use crate::error::BellaResult;
use bella_db::queries::customers::{self as queries, CustomerRow};
use bella_db::DbPool;
use model::{Customer, CustomerInput};
use uuid::Uuid;
use validator::Validate;

/// Register a new customer.
pub fn create_customer(
    pool: &DbPool,
    clock: &dyn Clock,
    input: CustomerInput,
) -> BellaResult<Customer> {
    let input = input.normalized();
    input.validate()?;

    let row = CustomerRow {
        id: Uuid::new_v4(),
        name: input.name,
        email: input.email,
        phone: input.phone,
        address: input.address,
        created_at: clock.now(),
        updated_at: None,
    };
    queries::insert_customer(pool, &row)?;
    tracing::info!(customer_id = %row.id, "Customer created");

    Ok(Customer::from_row(row))
}

/// Get a customer by ID.
pub fn get_customer(pool: &DbPool, id: Uuid) -> BellaResult<Customer> {
    let row = queries::get_customer(pool, id)?;
    Ok(Customer::from_row(row))
}

/// List all customers ordered by name.
pub fn list_customers(pool: &DbPool) -> BellaResult<Vec<Customer>> {
    let rows = queries::list_customers(pool)?;
    Ok(rows.into_iter().map(Customer::from_row).collect())
}

/// Replace the contact details of a customer.
pub fn update_customer(
    pool: &DbPool,
    clock: &dyn Clock,
    id: Uuid,
    input: CustomerInput,
) -> BellaResult<Customer> {
    let input = input.normalized();
    input.validate()?;

    let mut row = queries::get_customer(pool, id)?;
    row.name = input.name;
    row.email = input.email;
    row.phone = input.phone;
    row.address = input.address;
    row.updated_at = Some(clock.now());
    queries::update_customer(pool, &row)?;
    tracing::info!(customer_id = %id, "Customer updated");

    Ok(Customer::from_row(row))
}

/// Delete a customer that no order or service order references.
pub fn delete_customer(pool: &DbPool, id: Uuid) -> BellaResult<()> {
    queries::delete_customer(pool, id)?;
    tracing::info!(customer_id = %id, "Customer deleted");
    Ok(())
}
