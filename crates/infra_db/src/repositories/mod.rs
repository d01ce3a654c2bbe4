//! Repository implementations
//!
//! Repositories own the SQL. They speak in row types and `DatabaseError`;
//! the adapters map rows to domain values.

pub mod policy;
pub mod subscriber;

pub use policy::{ComponentRow, NewComponentRow, PolicyRepository, PolicyRow};
pub use subscriber::{SubscriberRepository, SubscriberRow};
