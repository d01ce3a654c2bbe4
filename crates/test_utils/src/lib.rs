//! Test Utilities Crate
//!
//! Shared test infrastructure for the policy rating workspace.
//!
//! # Modules
//!
//! - `fixtures`: reference policies and generated subscriber registrations
//! - `builders`: builders for policy aggregates and create commands
//! - `database`: PostgreSQL testcontainer with migrations applied
//! - `assertions`: assertion helpers for rating types
//! - `generators`: proptest strategies for valid component sets

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
