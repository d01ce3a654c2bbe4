//! Premium calculation
//!
//! This module resolves each rating component against a market value and
//! folds the results into a premium quote.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::PolicyId;

use crate::aggregate::PolicyAggregate;
use crate::component::{Operation, PolicyComponent, COMPONENTS_PER_POLICY};
use crate::error::PolicyError;

const PERCENT: Decimal = dec!(100);

/// A computed premium for one policy and market value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumQuote {
    /// Storage id of the quoted policy
    pub policy_id: PolicyId,
    /// Display name of the quoted policy
    pub policy_name: String,
    /// Unrounded premium
    pub premium: Decimal,
}

/// Computes a single component's contribution to the premium
///
/// A non-zero flat value is used as-is; otherwise the percentage is applied to
/// the market value.
///
/// # Arguments
///
/// * `component` - The stored component
/// * `market_value` - The value percentages are computed against
///
/// # Errors
///
/// Returns `InvalidComponentValue` if the component carries both a flat value
/// and a percentage, which means the stored data is corrupt.
pub fn resolve(component: &PolicyComponent, market_value: Decimal) -> Result<Decimal, PolicyError> {
    if !component.has_exclusive_values() {
        return Err(PolicyError::invalid_value(
            component.sequence.value(),
            format!(
                "Cannot have both flat value and percentage present. flatValue = {}, percentage = {}",
                component.flat_value, component.percentage
            ),
        ));
    }

    if !component.flat_value.is_zero() {
        return Ok(component.flat_value);
    }

    market_value
        .checked_mul(component.percentage)
        .and_then(|scaled| scaled.checked_div(PERCENT))
        .ok_or_else(|| PolicyError::InvalidMarketValue(format!(
            "market value {} overflows component {}",
            market_value, component.sequence
        )))
}

/// Folds a policy's components into a premium
pub struct PremiumCalculator;

impl PremiumCalculator {
    /// Calculates the premium for a fully configured policy
    ///
    /// Components are applied in ascending sequence order: `add` components
    /// increase the running total and `subtract` components decrease it. The
    /// result is not rounded or clamped, so a large discount can produce a
    /// negative premium.
    ///
    /// # Errors
    ///
    /// - `IncompleteComponentSet` unless exactly four components are attached
    /// - `InvalidComponentValue` if any component violates flat/percentage
    ///   exclusivity; no partial total is returned
    pub fn calculate(policy: &PolicyAggregate, market_value: Decimal) -> Result<Decimal, PolicyError> {
        if policy.components.len() != COMPONENTS_PER_POLICY {
            return Err(PolicyError::IncompleteComponentSet {
                found: policy.components.len(),
            });
        }

        policy
            .ordered_components()
            .into_iter()
            .try_fold(Decimal::ZERO, |total, component| {
                let amount = resolve(component, market_value)?;
                let next = match component.operation {
                    Operation::Add => total.checked_add(amount),
                    Operation::Subtract => total.checked_sub(amount),
                };
                next.ok_or_else(|| PolicyError::InvalidMarketValue(
                    "premium total overflowed".to_string(),
                ))
            })
    }

    /// Calculates the premium and packages it as a quote
    pub fn quote(policy: &PolicyAggregate, market_value: Decimal) -> Result<PremiumQuote, PolicyError> {
        let premium = Self::calculate(policy, market_value)?;
        Ok(PremiumQuote {
            policy_id: policy.id(),
            policy_name: policy.name().to_string(),
            premium,
        })
    }
}
