//! Component set validation
//!
//! Structural checks over the components a caller supplies, applied before
//! anything is read from or written to storage.
//!
//! # Rules
//!
//! ## Complete sets (policy creation)
//! - Exactly four components with sequences {1, 2, 3, 4}
//! - Sorted ascending, the i-th component must carry sequence i; a lower
//!   sequence than expected is a duplicate, a higher one means the expected
//!   sequence is missing
//!
//! ## Partial sets (policy update)
//! - Zero to four components, each with a sequence in 1..=4
//! - No sequence may repeat
//!
//! ## Values (both)
//! - Flat value and percentage are mutually exclusive
//! - Flat value is never negative; percentage lies in 0..=100

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::component::{ComponentInput, Sequence, COMPONENTS_PER_POLICY};
use crate::error::{PolicyError, SequenceError};

const MAX_PERCENTAGE: Decimal = dec!(100);

/// Validator for candidate component sets
pub struct ComponentValidator;

impl ComponentValidator {
    /// Validates a full component set for policy creation
    ///
    /// # Errors
    ///
    /// - `InvalidSequence` for out-of-range, duplicate, or missing sequences
    /// - `InvalidComponentValue` for exclusivity or range violations
    pub fn validate_complete(components: &[ComponentInput]) -> Result<(), PolicyError> {
        Self::check_ranges(components)?;

        let sorted = Self::sorted_sequences(components);
        let mut expected = Sequence::FIRST;
        for found in &sorted {
            if *found != expected {
                return Err(Self::mismatch(*found, expected).into());
            }
            expected += 1;
        }

        if sorted.len() < COMPONENTS_PER_POLICY {
            return Err(SequenceError::Missing(expected).into());
        }

        Self::check_values(components)
    }

    /// Validates a partial component set for policy updates
    ///
    /// Sequences need not be contiguous or complete, but must be in range and
    /// unique.
    pub fn validate_partial(components: &[ComponentInput]) -> Result<(), PolicyError> {
        Self::check_ranges(components)?;

        let sorted = Self::sorted_sequences(components);
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(SequenceError::Duplicate(pair[0]).into());
        }

        Self::check_values(components)
    }

    /// Checks flat/percentage exclusivity and value ranges for every component
    pub fn check_values(components: &[ComponentInput]) -> Result<(), PolicyError> {
        for component in components {
            let flat = component.flat_value.unwrap_or(Decimal::ZERO);
            let percentage = component.percentage.unwrap_or(Decimal::ZERO);

            if !flat.is_zero() && !percentage.is_zero() {
                return Err(PolicyError::invalid_value(
                    component.sequence,
                    "A component cannot have both percentage and flat value set",
                ));
            }
            if flat < Decimal::ZERO {
                return Err(PolicyError::invalid_value(
                    component.sequence,
                    "Flat value cannot be negative",
                ));
            }
            if percentage < Decimal::ZERO || percentage > MAX_PERCENTAGE {
                return Err(PolicyError::invalid_value(
                    component.sequence,
                    "Percentage value must be between 0 and 100",
                ));
            }
        }
        Ok(())
    }

    fn check_ranges(components: &[ComponentInput]) -> Result<(), SequenceError> {
        for component in components {
            Sequence::new(component.sequence)?;
        }
        Ok(())
    }

    fn sorted_sequences(components: &[ComponentInput]) -> Vec<i32> {
        let mut sequences: Vec<i32> = components.iter().map(|c| c.sequence).collect();
        sequences.sort_unstable();
        sequences
    }

    fn mismatch(found: i32, expected: i32) -> SequenceError {
        if found < expected {
            SequenceError::Duplicate(found)
        } else {
            SequenceError::Missing(expected)
        }
    }
}
