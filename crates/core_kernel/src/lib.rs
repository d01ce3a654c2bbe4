//! Core Kernel - Foundational types shared by the policy rating service
//!
//! This crate provides the building blocks used across all domain crates:
//! - Strongly-typed storage identifiers and the human-facing policy number
//! - Port infrastructure (errors, marker traits, health checks)
//! - Offset/limit pagination

pub mod identifiers;
pub mod pagination;
pub mod ports;
pub mod error;

pub use identifiers::{PolicyId, ComponentId, SubscriberId, PolicyNumber};
pub use pagination::{PageRequest, Page};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
