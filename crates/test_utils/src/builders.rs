//! Test Data Builders
//!
//! Builders for policy aggregates and create commands. Tests set only the
//! fields they care about; everything else defaults to the reference policy.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ComponentId, PolicyId, PolicyNumber};
use domain_policy::{
    ComponentCatalog, ComponentInput, CreatePolicyCommand, PolicyAggregate, PolicyComponent,
    PolicyRecord, Sequence,
};

use crate::fixtures::PolicyFixtures;

/// Builds an in-memory `PolicyAggregate` without going through a store
pub struct TestPolicyBuilder {
    id: PolicyId,
    policy_number: i64,
    name: String,
    values: Vec<(i32, Decimal, Decimal)>,
    catalog: ComponentCatalog,
}

impl Default for TestPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPolicyBuilder {
    /// Starts from the reference values: flat 100, 5%, flat 50, 2%
    pub fn new() -> Self {
        Self {
            id: PolicyId::new(),
            policy_number: 1,
            name: "Test Policy".to_string(),
            values: vec![
                (1, dec!(100), dec!(0)),
                (2, dec!(0), dec!(5)),
                (3, dec!(50), dec!(0)),
                (4, dec!(0), dec!(2)),
            ],
            catalog: ComponentCatalog::standard(),
        }
    }

    pub fn with_number(mut self, policy_number: i64) -> Self {
        self.policy_number = policy_number;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the raw values at a sequence, bypassing validation
    pub fn with_values(mut self, sequence: i32, flat_value: Decimal, percentage: Decimal) -> Self {
        self.values.retain(|(s, _, _)| *s != sequence);
        self.values.push((sequence, flat_value, percentage));
        self
    }

    /// Drops the component at a sequence
    pub fn without(mut self, sequence: i32) -> Self {
        self.values.retain(|(s, _, _)| *s != sequence);
        self
    }

    /// Builds the aggregate
    ///
    /// # Panics
    ///
    /// Panics on a non-positive number or an out-of-range sequence
    pub fn build(self) -> PolicyAggregate {
        let policy_id = self.id;
        let components = self
            .values
            .into_iter()
            .map(|(sequence, flat_value, percentage)| {
                let sequence = Sequence::new(sequence).expect("sequence in 1..=4");
                let definition = self.catalog.definition(sequence);
                PolicyComponent {
                    id: ComponentId::new(),
                    policy_id,
                    sequence,
                    name: definition.name.clone(),
                    operation: definition.operation,
                    flat_value,
                    percentage,
                }
            })
            .collect();

        PolicyAggregate::new(
            PolicyRecord {
                id: policy_id,
                policy_number: PolicyNumber::new(self.policy_number).expect("positive policy number"),
                name: self.name,
            },
            components,
        )
    }
}

/// Builds a `CreatePolicyCommand`
pub struct CreatePolicyCommandBuilder {
    command: CreatePolicyCommand,
}

impl CreatePolicyCommandBuilder {
    /// Starts from the reference policy under the given number
    pub fn new(policy_number: i64) -> Self {
        Self {
            command: PolicyFixtures::reference_policy(policy_number),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.command.name = name.into();
        self
    }

    pub fn components(mut self, components: Vec<ComponentInput>) -> Self {
        self.command.components = components;
        self
    }

    /// Replaces the input for one sequence
    pub fn component(mut self, input: ComponentInput) -> Self {
        self.command.components.retain(|c| c.sequence != input.sequence);
        self.command.components.push(input);
        self
    }

    pub fn build(self) -> CreatePolicyCommand {
        self.command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_policy::PremiumCalculator;

    #[test]
    fn test_default_builder_is_reference_policy() {
        let policy = TestPolicyBuilder::new().build();
        let premium = PremiumCalculator::calculate(&policy, PolicyFixtures::reference_market_value()).unwrap();
        assert_eq!(premium, PolicyFixtures::reference_premium());
    }

    #[test]
    fn test_without_drops_component() {
        let policy = TestPolicyBuilder::new().without(3).without(4).build();
        assert_eq!(policy.components.len(), 2);
    }

    #[test]
    fn test_command_builder_replaces_component() {
        let command = CreatePolicyCommandBuilder::new(9)
            .component(ComponentInput::flat(2, dec!(10)))
            .build();
        assert_eq!(command.components.len(), 4);
        assert!(command.components.iter().any(|c| c.sequence == 2 && c.flat_value == Some(dec!(10))));
    }
}
