//! Bella Database Layer.
//!
//! SQLite persistence for the workshop: connection handling, schema
//! migrations, and one query module per aggregate.

pub mod migrations;
pub mod pool;
pub mod queries;

pub use pool::{init_pool, DbError, DbPool, DbResult};
