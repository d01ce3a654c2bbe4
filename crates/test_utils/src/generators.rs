//! Property-Based Test Generators
//!
//! Proptest strategies that produce component sets and market values
//! respecting the rating invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_policy::ComponentInput;

/// Strategy for flat values with two decimal places, 0 to 100,000
pub fn flat_value_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for percentages with two decimal places, 0 to 100
pub fn percentage_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

/// Strategy for strictly positive market values
pub fn market_value_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a single valid component input at the given sequence
///
/// Exactly one of flat value or percentage is supplied.
pub fn component_input_strategy(sequence: i32) -> impl Strategy<Value = ComponentInput> {
    prop_oneof![
        flat_value_strategy().prop_map(move |v| ComponentInput::flat(sequence, v)),
        percentage_strategy().prop_map(move |v| ComponentInput::percentage(sequence, v)),
    ]
}

/// Strategy for a complete, valid four-component set in shuffled order
pub fn valid_component_set_strategy() -> impl Strategy<Value = Vec<ComponentInput>> {
    (
        component_input_strategy(1),
        component_input_strategy(2),
        component_input_strategy(3),
        component_input_strategy(4),
    )
        .prop_map(|(a, b, c, d)| vec![a, b, c, d])
        .prop_shuffle()
}
