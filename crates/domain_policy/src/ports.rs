//! Policy Domain Ports
//!
//! This module defines the storage port for the rating engine. The policy
//! service only ever talks to `PolicyStore`; the PostgreSQL adapter lives in
//! `infra_db` and an in-memory adapter lives in [`memory`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_policy::{ComponentCatalog, PolicyService};
//! use domain_policy::memory::InMemoryPolicyStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryPolicyStore::new());
//! let service = PolicyService::new(store, ComponentCatalog::standard());
//! ```
//!
//! Every write is a single-record operation. Multi-step flows (create,
//! delete) are sequenced by the service, not wrapped in a transaction here.

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PageRequest, PolicyId, PolicyNumber, PortError};

use crate::aggregate::{NewPolicy, NewPolicyComponent, PolicyAggregate, PolicyRecord};
use crate::component::{ComponentValue, PolicyComponent, Sequence};

/// Storage port for policies and their components
#[async_trait]
pub trait PolicyStore: DomainPort + HealthCheckable {
    /// Loads a policy joined with its components
    ///
    /// # Returns
    ///
    /// `None` if no policy has the given number
    async fn get_by_number(&self, number: PolicyNumber) -> Result<Option<PolicyAggregate>, PortError>;

    /// Lists policies ordered by ascending policy number
    async fn list(&self, page: PageRequest) -> Result<Vec<PolicyAggregate>, PortError>;

    /// Inserts a policy record
    ///
    /// # Errors
    ///
    /// Returns `PortError::Conflict` if the policy number is already taken
    async fn create_policy(&self, policy: NewPolicy) -> Result<PolicyRecord, PortError>;

    /// Inserts one component for an existing policy
    async fn create_component(&self, component: NewPolicyComponent) -> Result<PolicyComponent, PortError>;

    /// Replaces the value of the component at `sequence`
    ///
    /// # Returns
    ///
    /// True if the stored values changed; false if they already matched or no
    /// such component exists
    async fn update_component_value(
        &self,
        policy_id: PolicyId,
        sequence: Sequence,
        value: ComponentValue,
    ) -> Result<bool, PortError>;

    /// Renames a policy
    ///
    /// # Returns
    ///
    /// True if the stored name changed
    async fn update_policy_name(&self, number: PolicyNumber, name: &str) -> Result<bool, PortError>;

    /// Deletes every component owned by a policy
    ///
    /// # Returns
    ///
    /// The number of components removed
    async fn delete_components(&self, policy_id: PolicyId) -> Result<u64, PortError>;

    /// Deletes the policy record itself
    ///
    /// # Returns
    ///
    /// True if a record was removed
    async fn delete_policy(&self, number: PolicyNumber) -> Result<bool, PortError>;
}

/// In-memory implementation of [`PolicyStore`]
///
/// Used by unit tests and by the API server when no database is configured.
pub mod memory {
    use super::*;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Arc;

    use chrono::Utc;
    use core_kernel::{AdapterHealth, ComponentId, HealthCheckResult};
    use tokio::sync::RwLock;

    /// Store operations that can be made to fail on demand
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum StoreOperation {
        Get,
        List,
        CreatePolicy,
        CreateComponent,
        UpdateComponent,
        UpdateName,
        DeleteComponents,
        DeletePolicy,
    }

    #[derive(Debug, Default)]
    struct State {
        policies: BTreeMap<PolicyNumber, PolicyRecord>,
        components: Vec<PolicyComponent>,
    }

    impl State {
        fn aggregate(&self, record: &PolicyRecord) -> PolicyAggregate {
            let components = self
                .components
                .iter()
                .filter(|c| c.policy_id == record.id)
                .cloned()
                .collect();
            PolicyAggregate::new(record.clone(), components)
        }
    }

    /// Policy store backed by `tokio::sync::RwLock`
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryPolicyStore {
        state: Arc<RwLock<State>>,
        failing: Arc<RwLock<HashSet<StoreOperation>>>,
    }

    impl InMemoryPolicyStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every subsequent call of `operation` fail with a connection error
        pub async fn fail_on(&self, operation: StoreOperation) {
            self.failing.write().await.insert(operation);
        }

        /// Clears all injected failures
        pub async fn clear_failures(&self) {
            self.failing.write().await.clear();
        }

        /// Returns the number of stored components across all policies
        pub async fn component_count(&self) -> usize {
            self.state.read().await.components.len()
        }

        /// Returns the number of stored policy records
        pub async fn policy_count(&self) -> usize {
            self.state.read().await.policies.len()
        }

        /// Overwrites a stored component's raw values, bypassing validation
        pub async fn force_component_values(
            &self,
            policy_id: PolicyId,
            sequence: Sequence,
            flat_value: rust_decimal::Decimal,
            percentage: rust_decimal::Decimal,
        ) -> bool {
            let mut state = self.state.write().await;
            match state
                .components
                .iter_mut()
                .find(|c| c.policy_id == policy_id && c.sequence == sequence)
            {
                Some(component) => {
                    component.flat_value = flat_value;
                    component.percentage = percentage;
                    true
                }
                None => false,
            }
        }

        async fn check(&self, operation: StoreOperation) -> Result<(), PortError> {
            if self.failing.read().await.contains(&operation) {
                return Err(PortError::connection(format!(
                    "injected failure for {:?}",
                    operation
                )));
            }
            Ok(())
        }
    }

    impl DomainPort for InMemoryPolicyStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryPolicyStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "memory-policy-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl PolicyStore for InMemoryPolicyStore {
        async fn get_by_number(&self, number: PolicyNumber) -> Result<Option<PolicyAggregate>, PortError> {
            self.check(StoreOperation::Get).await?;
            let state = self.state.read().await;
            Ok(state.policies.get(&number).map(|record| state.aggregate(record)))
        }

        async fn list(&self, page: PageRequest) -> Result<Vec<PolicyAggregate>, PortError> {
            self.check(StoreOperation::List).await?;
            let state = self.state.read().await;
            Ok(state
                .policies
                .values()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .map(|record| state.aggregate(record))
                .collect())
        }

        async fn create_policy(&self, policy: NewPolicy) -> Result<PolicyRecord, PortError> {
            self.check(StoreOperation::CreatePolicy).await?;
            let mut state = self.state.write().await;
            if state.policies.contains_key(&policy.policy_number) {
                return Err(PortError::conflict(format!(
                    "policy number {} already exists",
                    policy.policy_number
                )));
            }

            let record = PolicyRecord {
                id: PolicyId::new_v7(),
                policy_number: policy.policy_number,
                name: policy.name,
            };
            state.policies.insert(record.policy_number, record.clone());
            Ok(record)
        }

        async fn create_component(&self, component: NewPolicyComponent) -> Result<PolicyComponent, PortError> {
            self.check(StoreOperation::CreateComponent).await?;
            let mut state = self.state.write().await;
            if state
                .components
                .iter()
                .any(|c| c.policy_id == component.policy_id && c.sequence == component.sequence)
            {
                return Err(PortError::conflict(format!(
                    "component {} already exists for policy {}",
                    component.sequence, component.policy_id
                )));
            }

            let stored = PolicyComponent {
                id: ComponentId::new_v7(),
                policy_id: component.policy_id,
                sequence: component.sequence,
                name: component.name,
                operation: component.operation,
                flat_value: component.flat_value,
                percentage: component.percentage,
            };
            state.components.push(stored.clone());
            Ok(stored)
        }

        async fn update_component_value(
            &self,
            policy_id: PolicyId,
            sequence: Sequence,
            value: ComponentValue,
        ) -> Result<bool, PortError> {
            self.check(StoreOperation::UpdateComponent).await?;
            let mut state = self.state.write().await;
            Ok(state
                .components
                .iter_mut()
                .find(|c| c.policy_id == policy_id && c.sequence == sequence)
                .map(|component| component.apply_value(value))
                .unwrap_or(false))
        }

        async fn update_policy_name(&self, number: PolicyNumber, name: &str) -> Result<bool, PortError> {
            self.check(StoreOperation::UpdateName).await?;
            let mut state = self.state.write().await;
            match state.policies.get_mut(&number) {
                Some(record) if record.name != name => {
                    record.name = name.to_string();
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn delete_components(&self, policy_id: PolicyId) -> Result<u64, PortError> {
            self.check(StoreOperation::DeleteComponents).await?;
            let mut state = self.state.write().await;
            let before = state.components.len();
            state.components.retain(|c| c.policy_id != policy_id);
            Ok((before - state.components.len()) as u64)
        }

        async fn delete_policy(&self, number: PolicyNumber) -> Result<bool, PortError> {
            self.check(StoreOperation::DeletePolicy).await?;
            let mut state = self.state.write().await;
            Ok(state.policies.remove(&number).is_some())
        }
    }
}
