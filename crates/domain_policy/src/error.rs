//! Policy domain errors
//!
//! Every failure the rating engine can report is a variant here. None of them
//! are retried internally; callers receive them as the terminal result of the
//! current request.

use thiserror::Error;

use core_kernel::{PolicyNumber, PortError};

/// Structural problems with the sequence numbers of a component set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// A sequence number appeared more than once
    #[error("Duplicate sequence number detected for sequence {0}")]
    Duplicate(i32),

    /// A sequence number in 1..=4 was not supplied
    #[error("Missing component with sequence {0}")]
    Missing(i32),

    /// A sequence number outside 1..=4
    #[error("Sequence must be between 1 and 4, got {0}")]
    OutOfRange(i32),
}

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    /// No policy with the given number exists
    #[error("Policy {0} not found")]
    NotFound(PolicyNumber),

    /// A policy with the given number already exists
    #[error("A policy with id {0} already exists")]
    DuplicateIdentifier(PolicyNumber),

    /// Gap or duplicate in the supplied component sequences
    #[error("Invalid component sequence: {0}")]
    InvalidSequence(#[from] SequenceError),

    /// Flat value and percentage both set, or a value out of range
    #[error("Invalid value for component {sequence}: {reason}")]
    InvalidComponentValue {
        sequence: i32,
        reason: String,
    },

    /// A premium was requested for a policy without exactly four components
    #[error("Cannot calculate quote for this policy: expected 4 components, found {found}")]
    IncompleteComponentSet {
        found: usize,
    },

    /// The market value supplied for a quote is unusable
    #[error("Invalid market value: {0}")]
    InvalidMarketValue(String),

    /// Policy-level data (such as the name) is invalid
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// An operation name other than `add` or `subtract`
    #[error("Unknown component operation '{0}'")]
    UnknownOperation(String),

    /// An update request did not alter any stored state
    #[error("Policy update had no effect")]
    NoEffectiveChange,

    /// Storage or infrastructure failure
    #[error("Unexpected failure: {0}")]
    Unexpected(#[from] PortError),
}

impl PolicyError {
    /// Creates an invalid component value error
    pub fn invalid_value(sequence: i32, reason: impl Into<String>) -> Self {
        PolicyError::InvalidComponentValue {
            sequence,
            reason: reason.into(),
        }
    }

    /// Returns true for failures caused by the caller's input or the current
    /// stored state, as opposed to infrastructure failures
    pub fn is_domain_error(&self) -> bool {
        !matches!(self, PolicyError::Unexpected(_))
    }
}
