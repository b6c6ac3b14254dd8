//! Bella Core Library
//!
//! Domain models and business logic for the Bella Design Hub workshop:
//! customers, the product catalog, sales orders and the service orders
//! derived from them, production scheduling, expenses and the monthly
//! financial summary.

pub mod clock;
pub mod customer;
pub mod error;
pub mod expense;
pub mod finance;
pub mod money;
pub mod order;
pub mod product;
pub mod production;
pub mod service_order;
pub mod text;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{BellaError, BellaResult, ErrorKind};

#[cfg(test)]
pub(crate) mod test_support;
