//! Policy domain services
//!
//! `PolicyService` orchestrates the policy lifecycle (create, update, read,
//! delete) and premium quotes on top of a [`PolicyStore`].
//!
//! Create and delete are sequences of single-record writes. If a later step
//! fails, earlier writes are not compensated: a failed component insert leaves
//! a policy with fewer than four components, and a failed policy delete after
//! its components were removed leaves an empty policy behind. Both surface as
//! `PolicyError::Unexpected`.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use core_kernel::{Page, PageRequest, PolicyNumber, PortError};

use crate::aggregate::{NewPolicy, NewPolicyComponent, PolicyAggregate};
use crate::component::{ComponentCatalog, ComponentInput, Sequence};
use crate::error::PolicyError;
use crate::ports::PolicyStore;
use crate::premium::{PremiumCalculator, PremiumQuote};
use crate::validation::ComponentValidator;

/// Request to create a policy with its full component set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePolicyCommand {
    pub policy_number: i64,
    pub name: String,
    pub components: Vec<ComponentInput>,
}

/// Request to change a policy's name and/or some component values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePolicyCommand {
    pub name: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentInput>,
}

/// Outcome of a successful delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDeletion {
    pub policy_number: PolicyNumber,
    pub components_deleted: u64,
}

/// Orchestrates the policy lifecycle and premium quotes
///
/// The component catalog is held by value so each service instance carries its
/// own sequence → (name, operation) table.
pub struct PolicyService {
    store: Arc<dyn PolicyStore>,
    catalog: ComponentCatalog,
}

impl PolicyService {
    /// Creates a service over the given store and catalog
    pub fn new(store: Arc<dyn PolicyStore>, catalog: ComponentCatalog) -> Self {
        Self { store, catalog }
    }

    /// Returns the catalog used to name new components
    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    /// Returns the underlying store, e.g. for health checks
    pub fn store(&self) -> &Arc<dyn PolicyStore> {
        &self.store
    }

    /// Calculates a premium quote for a stored policy
    ///
    /// # Errors
    ///
    /// - `InvalidMarketValue` if `market_value` is not strictly positive
    /// - `NotFound` if no policy has the given number
    /// - `IncompleteComponentSet` unless exactly four components are attached
    /// - `InvalidComponentValue` if a stored component is corrupt
    #[instrument(skip(self), fields(policy_number = %number))]
    pub async fn calculate_premium(
        &self,
        number: PolicyNumber,
        market_value: Decimal,
    ) -> Result<PremiumQuote, PolicyError> {
        if market_value <= Decimal::ZERO {
            warn!(%market_value, "Rejected quote with non-positive market value");
            return Err(PolicyError::InvalidMarketValue(
                "Market value must be greater than 0".to_string(),
            ));
        }

        let policy = self.load(number).await?;
        let quote = PremiumCalculator::quote(&policy, market_value).map_err(|e| {
            warn!(error = %e, "Premium calculation rejected");
            e
        })?;

        info!(premium = %quote.premium, "Premium calculated");
        Ok(quote)
    }

    /// Creates a policy and its four components
    ///
    /// Component names and operations come from the catalog; only values are
    /// taken from the command.
    ///
    /// # Errors
    ///
    /// - `InvalidPolicy` for a non-positive number or empty name
    /// - `InvalidSequence` / `InvalidComponentValue` from validation
    /// - `DuplicateIdentifier` if the number is taken; nothing is written
    #[instrument(skip(self, command), fields(policy_number = command.policy_number))]
    pub async fn create_policy(&self, command: CreatePolicyCommand) -> Result<PolicyAggregate, PolicyError> {
        let number = PolicyNumber::new(command.policy_number)
            .map_err(|e| PolicyError::InvalidPolicy(e.to_string()))?;
        if command.name.trim().is_empty() {
            return Err(PolicyError::InvalidPolicy("Policy name is required".to_string()));
        }
        ComponentValidator::validate_complete(&command.components).map_err(|e| {
            warn!(error = %e, "Rejected policy components");
            e
        })?;

        if self.store.get_by_number(number).await?.is_some() {
            warn!("Policy number already in use");
            return Err(PolicyError::DuplicateIdentifier(number));
        }

        let record = self
            .store
            .create_policy(NewPolicy {
                policy_number: number,
                name: command.name,
            })
            .await
            .map_err(|e| Self::creation_error(number, e))?;
        debug!(policy_id = %record.id, "Policy record stored");

        let mut components = Vec::with_capacity(command.components.len());
        for input in &command.components {
            let sequence = Sequence::new(input.sequence)?;
            let definition = self.catalog.definition(sequence);
            let (flat_value, percentage) = input.initial_columns();

            let component = self
                .store
                .create_component(NewPolicyComponent {
                    policy_id: record.id,
                    sequence,
                    name: definition.name.clone(),
                    operation: definition.operation,
                    flat_value,
                    percentage,
                })
                .await
                .map_err(|e| {
                    error!(error = %e, %sequence, "Component insert failed after policy was stored");
                    PolicyError::Unexpected(e)
                })?;
            components.push(component);
        }

        info!(policy_id = %record.id, "Policy created");
        Ok(PolicyAggregate::new(record, components))
    }

    /// Applies a partial update and returns the reloaded policy
    ///
    /// Each supplied component value replaces the stored pair: writing a flat
    /// value zeroes the percentage and vice versa.
    ///
    /// # Errors
    ///
    /// - `InvalidSequence` / `InvalidComponentValue` from validation
    /// - `NotFound` if no policy has the given number
    /// - `NoEffectiveChange` if neither the name nor any value changed
    #[instrument(skip(self, command), fields(policy_number = %number))]
    pub async fn update_policy(
        &self,
        number: PolicyNumber,
        command: UpdatePolicyCommand,
    ) -> Result<PolicyAggregate, PolicyError> {
        ComponentValidator::validate_partial(&command.components).map_err(|e| {
            warn!(error = %e, "Rejected component update");
            e
        })?;

        let existing = self.load(number).await?;
        let mut changed = false;

        if let Some(name) = command.name.as_deref() {
            if name.trim().is_empty() {
                return Err(PolicyError::InvalidPolicy("Policy name cannot be empty".to_string()));
            }
            changed |= self.store.update_policy_name(number, name).await?;
        }

        for input in &command.components {
            let Some(value) = input.requested_value() else {
                continue;
            };
            let sequence = Sequence::new(input.sequence)?;
            changed |= self
                .store
                .update_component_value(existing.id(), sequence, value)
                .await?;
        }

        if !changed {
            warn!("Update did not change any stored value");
            return Err(PolicyError::NoEffectiveChange);
        }

        let updated = self.load(number).await?;
        info!("Policy updated");
        Ok(updated)
    }

    /// Loads a policy with its components
    #[instrument(skip(self), fields(policy_number = %number))]
    pub async fn get_policy(&self, number: PolicyNumber) -> Result<PolicyAggregate, PolicyError> {
        self.load(number).await
    }

    /// Lists policies ordered by policy number
    #[instrument(skip(self), fields(page = request.page(), size = request.size()))]
    pub async fn list_policies(&self, request: PageRequest) -> Result<Page<PolicyAggregate>, PolicyError> {
        let policies = self.store.list(request).await?;
        debug!(count = policies.len(), "Listed policies");
        Ok(Page::new(request, policies))
    }

    /// Deletes a policy and all of its components
    ///
    /// Components are removed first, then the policy record.
    ///
    /// # Errors
    ///
    /// `NotFound` if no policy has the given number; nothing is deleted
    #[instrument(skip(self), fields(policy_number = %number))]
    pub async fn delete_policy(&self, number: PolicyNumber) -> Result<PolicyDeletion, PolicyError> {
        let existing = self.load(number).await?;

        let components_deleted = self.store.delete_components(existing.id()).await?;
        let removed = self.store.delete_policy(number).await.map_err(|e| {
            error!(error = %e, components_deleted, "Policy delete failed after its components were removed");
            PolicyError::Unexpected(e)
        })?;

        if !removed {
            warn!("Policy disappeared before it could be deleted");
            return Err(PolicyError::NotFound(number));
        }

        info!(components_deleted, "Policy deleted");
        Ok(PolicyDeletion {
            policy_number: number,
            components_deleted,
        })
    }

    /// Returns true if the store holds no policies
    pub async fn is_empty(&self) -> Result<bool, PolicyError> {
        let first = self.store.list(PageRequest::default()).await?;
        Ok(first.is_empty())
    }

    async fn load(&self, number: PolicyNumber) -> Result<PolicyAggregate, PolicyError> {
        self.store
            .get_by_number(number)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to load policy");
                PolicyError::Unexpected(e)
            })?
            .ok_or(PolicyError::NotFound(number))
    }

    fn creation_error(number: PolicyNumber, error: PortError) -> PolicyError {
        if error.is_conflict() {
            PolicyError::DuplicateIdentifier(number)
        } else {
            PolicyError::Unexpected(error)
        }
    }
}
