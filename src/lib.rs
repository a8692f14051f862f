//! Serialized SQLite access with migrations and custom value binding.
//!
//! # Intention
//!
//! - Provide a small, unified API over a single SQLite connection: a
//!   [`DatabaseQueue`] for statements and transactions, a [`Migrator`] for
//!   once-only schema changes, and materialized [`Row`] extraction.
//! - Let application types bind to parameters and decode from columns as if
//!   they were native scalars, via the [`DatabaseValue`] trait.
//!
//! # Architectural Boundaries
//!
//! - Only SQLite/database code belongs here.
//! - No business logic or unrelated utilities.

pub mod convert;
pub mod error;
pub mod migrate;
pub mod queue;
pub mod row;
pub mod value;

pub use convert::DatabaseValue;
pub use error::{Error, Result};
pub use migrate::Migrator;
pub use queue::{Database, DatabaseQueue, Transaction};
pub use row::Row;
pub use value::Value;
