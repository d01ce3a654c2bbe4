//! Infrastructure Database Layer
//!
//! PostgreSQL storage for the policy rating service using SQLx.
//!
//! # Architecture
//!
//! - `repositories`: row types and the SQL for each table
//! - `adapters`: implementations of the domain ports (`PolicyStore`,
//!   `SubscriberStore`) built on the repositories
//! - `pool`: pool configuration and embedded migrations
//!
//! Queries are checked at runtime, so building the crate needs no database.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresPolicyStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/policy_rating")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresPolicyStore::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::{PostgresPolicyStore, PostgresSubscriberStore};
pub use error::DatabaseError;
pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool, MIGRATOR};
