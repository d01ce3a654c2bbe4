//! Policy Rating Domain
//!
//! This crate implements the policy component rating engine: a policy is
//! rated by four ordered components, each contributing a flat amount or a
//! percentage of a caller-supplied market value, added to or subtracted from
//! the premium.
//!
//! # Architecture
//!
//! The domain layer is infrastructure-agnostic:
//! - **Catalog**: the sequence → (name, operation) table, passed by value
//! - **Validator**: structural checks on candidate component sets
//! - **Calculator**: resolves components and folds them into a premium
//! - **Service**: the create / update / read / delete lifecycle over a
//!   `PolicyStore` port
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{ComponentCatalog, PolicyService};
//! use domain_policy::memory::InMemoryPolicyStore;
//!
//! let service = PolicyService::new(Arc::new(InMemoryPolicyStore::new()), ComponentCatalog::standard());
//! let quote = service.calculate_premium(PolicyNumber::new(1)?, dec!(100000)).await?;
//! ```

pub mod aggregate;
pub mod component;
pub mod error;
pub mod ports;
pub mod premium;
pub mod services;
pub mod validation;

pub use aggregate::{NewPolicy, NewPolicyComponent, PolicyAggregate, PolicyRecord};
pub use component::{
    ComponentCatalog, ComponentDefinition, ComponentInput, ComponentValue, Operation,
    PolicyComponent, Sequence, COMPONENTS_PER_POLICY,
};
pub use error::{PolicyError, SequenceError};
pub use ports::{memory, PolicyStore};
pub use premium::{resolve, PremiumCalculator, PremiumQuote};
pub use services::{CreatePolicyCommand, PolicyDeletion, PolicyService, UpdatePolicyCommand};
pub use validation::ComponentValidator;
