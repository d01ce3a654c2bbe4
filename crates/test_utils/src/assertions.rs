//! Custom Test Assertions
//!
//! Assertion helpers for rating types with more useful failure messages than
//! plain `assert_eq!`.

use rust_decimal::Decimal;

use domain_policy::{PolicyAggregate, Sequence};

/// Asserts that every stored component carries at most one non-zero value
///
/// # Panics
///
/// Panics naming the first offending sequence
pub fn assert_components_exclusive(policy: &PolicyAggregate) {
    for component in &policy.components {
        assert!(
            component.has_exclusive_values(),
            "Component {} of policy {} has both flat value {} and percentage {}",
            component.sequence,
            policy.policy_number(),
            component.flat_value,
            component.percentage
        );
    }
}

/// Asserts that a policy carries exactly sequences 1..=4 in order
pub fn assert_fully_configured(policy: &PolicyAggregate) {
    let sequences: Vec<i32> = policy.components.iter().map(|c| c.sequence.value()).collect();
    assert_eq!(
        sequences,
        vec![1, 2, 3, 4],
        "Policy {} does not carry a complete component set",
        policy.policy_number()
    );
}

/// Asserts the stored values of the component at `sequence`
pub fn assert_component_values(
    policy: &PolicyAggregate,
    sequence: i32,
    flat_value: Decimal,
    percentage: Decimal,
) {
    let sequence = Sequence::new(sequence).expect("sequence in 1..=4");
    let component = policy
        .component(sequence)
        .unwrap_or_else(|| panic!("Policy {} has no component {}", policy.policy_number(), sequence));

    assert_eq!(
        (component.flat_value, component.percentage),
        (flat_value, percentage),
        "Component {} values differ (flat, percentage)",
        sequence
    );
}
