//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for policies and subscribers. Values are fixed so
//! expected premiums can be written down exactly.

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_policy::{ComponentInput, CreatePolicyCommand};
use domain_subscriber::RegisterSubscriber;

/// Fixture for policy test data
pub struct PolicyFixtures;

impl PolicyFixtures {
    /// Market value used with [`PolicyFixtures::reference_components`]
    pub fn reference_market_value() -> Decimal {
        dec!(100000)
    }

    /// Premium for the reference components at the reference market value
    ///
    /// 100 + 5000 + 50 - 2000
    pub fn reference_premium() -> Decimal {
        dec!(3150)
    }

    /// Flat 100, 5%, flat 50, 2%
    pub fn reference_components() -> Vec<ComponentInput> {
        vec![
            ComponentInput::flat(1, dec!(100)),
            ComponentInput::percentage(2, dec!(5)),
            ComponentInput::flat(3, dec!(50)),
            ComponentInput::percentage(4, dec!(2)),
        ]
    }

    /// A create command for the reference policy under the given number
    pub fn reference_policy(policy_number: i64) -> CreatePolicyCommand {
        CreatePolicyCommand {
            policy_number,
            name: format!("Reference Policy {}", policy_number),
            components: Self::reference_components(),
        }
    }

    /// A component set with both values set on sequence 2
    pub fn conflicting_components() -> Vec<ComponentInput> {
        let mut components = Self::reference_components();
        components[1].flat_value = Some(dec!(25));
        components
    }
}

/// Fixture for subscriber test data
pub struct SubscriberFixtures;

impl SubscriberFixtures {
    /// Password shared by every generated registration
    pub const PASSWORD: &'static str = "correct-horse-battery";

    /// A registration with random names and email
    pub fn registration() -> RegisterSubscriber {
        RegisterSubscriber {
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            email: SafeEmail().fake(),
            password: Self::PASSWORD.to_string(),
        }
    }

    /// A registration for a specific email
    pub fn registration_for(email: &str) -> RegisterSubscriber {
        RegisterSubscriber {
            email: email.to_string(),
            ..Self::registration()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_generated_registration_is_valid() {
        assert!(SubscriberFixtures::registration().validate().is_ok());
    }

    #[test]
    fn test_reference_components_cover_all_sequences() {
        let sequences: Vec<i32> = PolicyFixtures::reference_components()
            .iter()
            .map(|c| c.sequence)
            .collect();
        assert_eq!(sequences, vec![1, 2, 3, 4]);
    }
}
