//! Rating components and the sequence catalog
//!
//! A policy is rated by exactly four components. Each component's position
//! (its sequence) fixes its display name and whether it adds to or subtracts
//! from the premium; only the flat value or percentage is chosen per policy.
//!
//! | sequence | name                 | operation |
//! |----------|----------------------|-----------|
//! | 1        | Premium Base         | add       |
//! | 2        | Extra Perils         | add       |
//! | 3        | Market Value Premium | add       |
//! | 4        | Promo Discount       | subtract  |

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ComponentId, PolicyId};

use crate::error::{PolicyError, SequenceError};

/// Number of components a fully configured policy carries
pub const COMPONENTS_PER_POLICY: usize = 4;

/// Position of a component within a policy (1..=4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Sequence(u8);

impl Sequence {
    pub const FIRST: i32 = 1;
    pub const LAST: i32 = COMPONENTS_PER_POLICY as i32;

    /// Creates a sequence, rejecting values outside 1..=4
    pub fn new(value: i32) -> Result<Self, SequenceError> {
        if !(Self::FIRST..=Self::LAST).contains(&value) {
            return Err(SequenceError::OutOfRange(value));
        }
        Ok(Self(value as u8))
    }

    /// Returns all valid sequences in ascending order
    pub fn all() -> impl Iterator<Item = Sequence> {
        (Self::FIRST..=Self::LAST).map(|value| Sequence(value as u8))
    }

    pub fn value(&self) -> i32 {
        i32::from(self.0)
    }
}

impl TryFrom<i32> for Sequence {
    type Error = SequenceError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sequence> for i32 {
    fn from(sequence: Sequence) -> i32 {
        sequence.value()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a component's amount is folded into the premium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = PolicyError;

    /// Parses an operation name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Operation::Add),
            "subtract" => Ok(Operation::Subtract),
            _ => Err(PolicyError::UnknownOperation(s.to_string())),
        }
    }
}

/// A replace-not-merge value assignment for one component
///
/// Writing one field always zeroes the other, so a stored component never
/// carries both a flat value and a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ComponentValue {
    Flat(Decimal),
    Percentage(Decimal),
}

impl ComponentValue {
    /// Returns the `(flat_value, percentage)` pair to persist
    pub fn as_columns(&self) -> (Decimal, Decimal) {
        match *self {
            ComponentValue::Flat(flat) => (flat, Decimal::ZERO),
            ComponentValue::Percentage(percentage) => (Decimal::ZERO, percentage),
        }
    }
}

/// A component as supplied by a caller, before validation
///
/// The same shape is used for creation (all four sequences) and for partial
/// updates (any subset of sequences).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInput {
    pub sequence: i32,
    #[serde(default)]
    pub flat_value: Option<Decimal>,
    #[serde(default)]
    pub percentage: Option<Decimal>,
}

impl ComponentInput {
    pub fn flat(sequence: i32, flat_value: Decimal) -> Self {
        Self {
            sequence,
            flat_value: Some(flat_value),
            percentage: None,
        }
    }

    pub fn percentage(sequence: i32, percentage: Decimal) -> Self {
        Self {
            sequence,
            flat_value: None,
            percentage: Some(percentage),
        }
    }

    /// A component with neither value supplied
    pub fn empty(sequence: i32) -> Self {
        Self {
            sequence,
            flat_value: None,
            percentage: None,
        }
    }

    /// Returns the value assignment this input requests, if any
    ///
    /// A non-zero percentage wins over a zero flat value; otherwise a supplied
    /// flat value is used. Inputs with both fields non-zero are rejected by the
    /// validator before this is consulted.
    pub fn requested_value(&self) -> Option<ComponentValue> {
        match (self.flat_value, self.percentage) {
            (_, Some(percentage)) if !percentage.is_zero() => Some(ComponentValue::Percentage(percentage)),
            (Some(flat), _) => Some(ComponentValue::Flat(flat)),
            (None, Some(percentage)) => Some(ComponentValue::Percentage(percentage)),
            (None, None) => None,
        }
    }

    /// Returns the `(flat_value, percentage)` pair for a newly created component
    pub fn initial_columns(&self) -> (Decimal, Decimal) {
        (
            self.flat_value.unwrap_or(Decimal::ZERO),
            self.percentage.unwrap_or(Decimal::ZERO),
        )
    }
}

/// A stored rating component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyComponent {
    pub id: ComponentId,
    pub policy_id: PolicyId,
    pub sequence: Sequence,
    pub name: String,
    pub operation: Operation,
    pub flat_value: Decimal,
    pub percentage: Decimal,
}

impl PolicyComponent {
    /// Returns true if at most one of flat value and percentage is non-zero
    pub fn has_exclusive_values(&self) -> bool {
        self.flat_value.is_zero() || self.percentage.is_zero()
    }

    /// Applies a replace-not-merge value assignment
    ///
    /// Returns true if the stored values changed.
    pub fn apply_value(&mut self, value: ComponentValue) -> bool {
        let (flat_value, percentage) = value.as_columns();
        let changed = self.flat_value != flat_value || self.percentage != percentage;
        self.flat_value = flat_value;
        self.percentage = percentage;
        changed
    }
}

/// Canonical name and operation for one sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    pub sequence: Sequence,
    pub name: String,
    pub operation: Operation,
}

/// The fixed sequence → (name, operation) lookup table
///
/// The catalog is an ordinary value handed to the policy service, so tests
/// and alternative deployments can supply their own table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentCatalog {
    definitions: BTreeMap<Sequence, ComponentDefinition>,
}

impl ComponentCatalog {
    /// Builds a catalog from explicit definitions
    ///
    /// # Errors
    ///
    /// Returns `InvalidSequence` unless every sequence 1..=4 is defined
    /// exactly once.
    pub fn new(definitions: Vec<ComponentDefinition>) -> Result<Self, PolicyError> {
        let mut table = BTreeMap::new();
        for definition in definitions {
            let sequence = definition.sequence;
            if table.insert(sequence, definition).is_some() {
                return Err(SequenceError::Duplicate(sequence.value()).into());
            }
        }

        if let Some(missing) = Sequence::all().find(|s| !table.contains_key(s)) {
            return Err(SequenceError::Missing(missing.value()).into());
        }

        Ok(Self { definitions: table })
    }

    /// The standard four-component table
    pub fn standard() -> Self {
        let entries = [
            ("Premium Base", Operation::Add),
            ("Extra Perils", Operation::Add),
            ("Market Value Premium", Operation::Add),
            ("Promo Discount", Operation::Subtract),
        ];

        let definitions = Sequence::all()
            .zip(entries)
            .map(|(sequence, (name, operation))| {
                (
                    sequence,
                    ComponentDefinition {
                        sequence,
                        name: name.to_string(),
                        operation,
                    },
                )
            })
            .collect();

        Self { definitions }
    }

    /// Looks up the definition for a sequence
    pub fn definition(&self, sequence: Sequence) -> &ComponentDefinition {
        // Construction guarantees an entry for every valid sequence
        &self.definitions[&sequence]
    }

    /// Iterates definitions in ascending sequence order
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.definitions.values()
    }
}

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_standard_catalog_table() {
        let catalog = ComponentCatalog::standard();
        let rows: Vec<_> = catalog
            .iter()
            .map(|d| (d.sequence.value(), d.name.as_str(), d.operation))
            .collect();

        assert_eq!(
            rows,
            vec![
                (1, "Premium Base", Operation::Add),
                (2, "Extra Perils", Operation::Add),
                (3, "Market Value Premium", Operation::Add),
                (4, "Promo Discount", Operation::Subtract),
            ]
        );
    }

    #[test]
    fn test_catalog_rejects_missing_sequence() {
        let mut definitions: Vec<_> = ComponentCatalog::standard().iter().cloned().collect();
        definitions.remove(2);

        let err = ComponentCatalog::new(definitions).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidSequence(SequenceError::Missing(3))));
    }

    #[test]
    fn test_operation_parsing() {
        assert_eq!("ADD".parse::<Operation>().unwrap(), Operation::Add);
        assert_eq!("subtract".parse::<Operation>().unwrap(), Operation::Subtract);
        assert!(matches!(
            "multiply".parse::<Operation>(),
            Err(PolicyError::UnknownOperation(_))
        ));
    }

    #[test]
    fn test_requested_value_prefers_non_zero_percentage() {
        let input = ComponentInput {
            sequence: 2,
            flat_value: Some(dec!(0)),
            percentage: Some(dec!(5)),
        };
        assert_eq!(input.requested_value(), Some(ComponentValue::Percentage(dec!(5))));

        assert_eq!(ComponentInput::empty(1).requested_value(), None);
        assert_eq!(
            ComponentInput::flat(1, dec!(100)).requested_value(),
            Some(ComponentValue::Flat(dec!(100)))
        );
    }

    #[test]
    fn test_apply_value_resets_other_field() {
        let mut component = PolicyComponent {
            id: ComponentId::new(),
            policy_id: PolicyId::new(),
            sequence: Sequence::new(3).unwrap(),
            name: "Market Value Premium".to_string(),
            operation: Operation::Add,
            flat_value: dec!(0),
            percentage: dec!(10),
        };

        assert!(component.apply_value(ComponentValue::Flat(dec!(250))));
        assert_eq!(component.flat_value, dec!(250));
        assert_eq!(component.percentage, dec!(0));

        assert!(!component.apply_value(ComponentValue::Flat(dec!(250))));
    }
}
