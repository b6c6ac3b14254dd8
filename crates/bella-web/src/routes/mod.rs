//! Route handlers.

pub mod customers;
pub mod expenses;
pub mod finance;
pub mod health;
pub mod orders;
pub mod production;
pub mod products;
pub mod service_orders;
