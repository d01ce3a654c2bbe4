//! Premium Calculation Tests
//!
//! Tests for the component value resolver and the premium calculator:
//! - Flat and percentage resolution
//! - The signed fold over components in sequence order
//! - Rejection of incomplete or corrupt component sets
//!
//! # Test Organization
//!
//! - `resolver_tests` - single component resolution
//! - `calculator_tests` - fixed examples for the fold
//! - `calculator_properties` - proptest properties over arbitrary valid sets

use core_kernel::{ComponentId, PolicyId, PolicyNumber};
use domain_policy::{
    resolve, Operation, PolicyAggregate, PolicyComponent, PolicyError, PolicyRecord,
    PremiumCalculator, Sequence,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_utils::TestPolicyBuilder;

fn component(
    policy_id: PolicyId,
    sequence: i32,
    operation: Operation,
    flat_value: Decimal,
    percentage: Decimal,
) -> PolicyComponent {
    PolicyComponent {
        id: ComponentId::new(),
        policy_id,
        sequence: Sequence::new(sequence).unwrap(),
        name: format!("Component {}", sequence),
        operation,
        flat_value,
        percentage,
    }
}

fn policy_with(build: impl FnOnce(PolicyId) -> Vec<PolicyComponent>) -> PolicyAggregate {
    let id = PolicyId::new();
    PolicyAggregate::new(
        PolicyRecord {
            id,
            policy_number: PolicyNumber::new(42).unwrap(),
            name: "Quote Test Policy".to_string(),
        },
        build(id),
    )
}

fn reference_policy() -> PolicyAggregate {
    policy_with(|id| {
        vec![
            component(id, 1, Operation::Add, dec!(100), dec!(0)),
            component(id, 2, Operation::Add, dec!(0), dec!(5)),
            component(id, 3, Operation::Add, dec!(50), dec!(0)),
            component(id, 4, Operation::Subtract, dec!(0), dec!(2)),
        ]
    })
}

// ============================================================================
// RESOLVER TESTS
// ============================================================================

mod resolver_tests {
    use super::*;

    #[test]
    fn test_flat_value_ignores_market_value() {
        let c = component(PolicyId::new(), 1, Operation::Add, dec!(300), dec!(0));
        assert_eq!(resolve(&c, dec!(1)).unwrap(), dec!(300));
        assert_eq!(resolve(&c, dec!(999999)).unwrap(), dec!(300));
    }

    #[test]
    fn test_percentage_of_market_value() {
        let c = component(PolicyId::new(), 3, Operation::Add, dec!(0), dec!(12.5));
        assert_eq!(resolve(&c, dec!(2000)).unwrap(), dec!(250));
    }

    #[test]
    fn test_both_zero_resolves_to_zero() {
        let c = component(PolicyId::new(), 4, Operation::Subtract, dec!(0), dec!(0));
        assert_eq!(resolve(&c, dec!(100000)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_both_set_is_rejected() {
        let c = component(PolicyId::new(), 2, Operation::Add, dec!(1), dec!(1));
        let err = resolve(&c, dec!(100)).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidComponentValue { sequence: 2, .. }));
    }
}

// ============================================================================
// CALCULATOR TESTS
// ============================================================================

mod calculator_tests {
    use super::*;

    #[test]
    fn test_reference_premium() {
        let premium = PremiumCalculator::calculate(&reference_policy(), dec!(100000)).unwrap();
        assert_eq!(premium, dec!(3150), "100 + 5000 + 50 - 2000");
    }

    #[test]
    fn test_calculation_is_repeatable() {
        let policy = reference_policy();
        let first = PremiumCalculator::calculate(&policy, dec!(73125.50)).unwrap();
        let second = PremiumCalculator::calculate(&policy, dec!(73125.50)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_premium_may_go_negative() {
        let policy = policy_with(|id| {
            vec![
                component(id, 1, Operation::Add, dec!(10), dec!(0)),
                component(id, 2, Operation::Add, dec!(0), dec!(0)),
                component(id, 3, Operation::Add, dec!(0), dec!(0)),
                component(id, 4, Operation::Subtract, dec!(0), dec!(50)),
            ]
        });

        let premium = PremiumCalculator::calculate(&policy, dec!(1000)).unwrap();
        assert_eq!(premium, dec!(-490));
    }

    #[test]
    fn test_two_components_is_incomplete() {
        let policy = TestPolicyBuilder::new().without(3).without(4).build();

        let err = PremiumCalculator::calculate(&policy, dec!(100000)).unwrap_err();
        assert!(matches!(err, PolicyError::IncompleteComponentSet { found: 2 }));
    }

    #[test]
    fn test_corrupt_component_aborts_whole_calculation() {
        let policy = TestPolicyBuilder::new().with_values(3, dec!(50), dec!(10)).build();

        let err = PremiumCalculator::calculate(&policy, dec!(100000)).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidComponentValue { sequence: 3, .. }));
    }

    #[test]
    fn test_quote_carries_policy_identity() {
        let policy = reference_policy();
        let quote = PremiumCalculator::quote(&policy, dec!(100000)).unwrap();
        assert_eq!(quote.policy_id, policy.id());
        assert_eq!(quote.policy_name, "Quote Test Policy");
        assert_eq!(quote.premium, dec!(3150));
    }
}

// ============================================================================
// CALCULATOR PROPERTIES
// ============================================================================

mod calculator_properties {
    use super::*;
    use test_utils::{flat_value_strategy, market_value_strategy, percentage_strategy};

    /// (sequence, (use_flat, flat value, percentage, add)) in shuffled storage order
    type Part = (i32, (bool, Decimal, Decimal, bool));

    fn shuffled_parts() -> impl Strategy<Value = Vec<Part>> {
        proptest::collection::vec(
            (any::<bool>(), flat_value_strategy(), percentage_strategy(), any::<bool>()),
            4,
        )
        .prop_map(|values| (1..=4).zip(values).collect::<Vec<_>>())
        .prop_shuffle()
    }

    fn build(parts: &[Part]) -> PolicyAggregate {
        policy_with(|id| {
            parts
                .iter()
                .map(|(sequence, (use_flat, flat, pct, add))| {
                    let (flat_value, percentage) = if *use_flat {
                        (*flat, Decimal::ZERO)
                    } else {
                        (Decimal::ZERO, *pct)
                    };
                    let operation = if *add { Operation::Add } else { Operation::Subtract };
                    component(id, *sequence, operation, flat_value, percentage)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn premium_is_signed_sum_in_sequence_order(
            parts in shuffled_parts(),
            market_value in market_value_strategy(),
        ) {
            let policy = build(&parts);

            let sequences: Vec<i32> = policy
                .ordered_components()
                .iter()
                .map(|c| c.sequence.value())
                .collect();
            prop_assert_eq!(sequences, vec![1, 2, 3, 4]);

            let mut ascending = parts.clone();
            ascending.sort_by_key(|(sequence, _)| *sequence);
            let expected = ascending
                .iter()
                .fold(Decimal::ZERO, |total, (_, (use_flat, flat, pct, add))| {
                    let amount = if *use_flat {
                        *flat
                    } else {
                        market_value * *pct / dec!(100)
                    };
                    if *add { total + amount } else { total - amount }
                });

            let premium = PremiumCalculator::calculate(&policy, market_value).unwrap();
            prop_assert_eq!(premium, expected);
        }

        #[test]
        fn fewer_than_four_components_never_yields_a_total(
            parts in shuffled_parts(),
            kept in 0usize..4,
            market_value in market_value_strategy(),
        ) {
            let policy = build(&parts[..kept]);
            let result = PremiumCalculator::calculate(&policy, market_value);
            let is_incomplete = matches!(result, Err(PolicyError::IncompleteComponentSet { .. }));
            prop_assert!(is_incomplete);
        }
    }
}
