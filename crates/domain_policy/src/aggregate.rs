//! Policy Aggregate
//!
//! A policy record together with the components it owns. Components never
//! outlive their policy; the lifecycle service removes them before the policy
//! itself.
//!
//! # Invariants
//!
//! - At most four components per policy
//! - Sequences are unique within a policy
//! - A component's flat value and percentage are never both non-zero

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{PolicyId, PolicyNumber};

use crate::component::{Operation, PolicyComponent, Sequence, COMPONENTS_PER_POLICY};

/// A stored policy without its components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
    /// Storage identity
    pub id: PolicyId,
    /// Human-facing number used by callers
    pub policy_number: PolicyNumber,
    /// Display name
    pub name: String,
}

/// A policy joined with its components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyAggregate {
    pub policy: PolicyRecord,
    pub components: Vec<PolicyComponent>,
}

impl PolicyAggregate {
    /// Creates an aggregate, ordering components by sequence
    pub fn new(policy: PolicyRecord, mut components: Vec<PolicyComponent>) -> Self {
        components.sort_by_key(|c| c.sequence);
        Self { policy, components }
    }

    pub fn id(&self) -> PolicyId {
        self.policy.id
    }

    pub fn policy_number(&self) -> PolicyNumber {
        self.policy.policy_number
    }

    pub fn name(&self) -> &str {
        &self.policy.name
    }

    /// Returns the component at the given sequence, if attached
    pub fn component(&self, sequence: Sequence) -> Option<&PolicyComponent> {
        self.components.iter().find(|c| c.sequence == sequence)
    }

    /// Returns components in ascending sequence order
    pub fn ordered_components(&self) -> Vec<&PolicyComponent> {
        let mut ordered: Vec<_> = self.components.iter().collect();
        ordered.sort_by_key(|c| c.sequence);
        ordered
    }

    /// Returns true once all four components are attached
    pub fn is_fully_configured(&self) -> bool {
        self.components.len() == COMPONENTS_PER_POLICY
    }
}

/// Data for creating a policy record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPolicy {
    pub policy_number: PolicyNumber,
    pub name: String,
}

/// Data for creating a component bound to an existing policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPolicyComponent {
    pub policy_id: PolicyId,
    pub sequence: Sequence,
    pub name: String,
    pub operation: Operation,
    pub flat_value: Decimal,
    pub percentage: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::ComponentId;
    use rust_decimal_macros::dec;

    fn component(policy_id: PolicyId, sequence: i32) -> PolicyComponent {
        PolicyComponent {
            id: ComponentId::new(),
            policy_id,
            sequence: Sequence::new(sequence).unwrap(),
            name: format!("component {}", sequence),
            operation: Operation::Add,
            flat_value: dec!(10),
            percentage: dec!(0),
        }
    }

    #[test]
    fn test_new_sorts_components() {
        let policy = PolicyRecord {
            id: PolicyId::new(),
            policy_number: PolicyNumber::new(9).unwrap(),
            name: "Sorted".to_string(),
        };
        let components = vec![
            component(policy.id, 3),
            component(policy.id, 1),
            component(policy.id, 4),
        ];

        let aggregate = PolicyAggregate::new(policy, components);

        let sequences: Vec<i32> = aggregate.components.iter().map(|c| c.sequence.value()).collect();
        assert_eq!(sequences, vec![1, 3, 4]);
        assert!(!aggregate.is_fully_configured());
        assert!(aggregate.component(Sequence::new(2).unwrap()).is_none());
    }
}
