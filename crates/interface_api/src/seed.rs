//! Demo data seeding
//!
//! Populates empty stores with three sample policies and one subscriber so a
//! fresh deployment can be exercised immediately. Stores that already hold
//! data are left untouched.

use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::info;

use domain_policy::{ComponentInput, CreatePolicyCommand, PolicyError, PolicyService};
use domain_subscriber::{RegisterSubscriber, SubscriberError, SubscriberService};

/// Email of the demo subscriber
pub const DEMO_EMAIL: &str = "test@example.com";
/// Password of the demo subscriber
pub const DEMO_PASSWORD: &str = "kwamepassword";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to seed policies: {0}")]
    Policy(#[from] PolicyError),
    #[error("Failed to seed subscribers: {0}")]
    Subscriber(#[from] SubscriberError),
}

/// What a seeding run inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub policies: usize,
    pub subscribers: usize,
}

/// The demo policies: low, medium and high claim tiers
pub fn demo_policies() -> Vec<CreatePolicyCommand> {
    vec![
        CreatePolicyCommand {
            policy_number: 1,
            name: "Low Claim Policy".to_string(),
            components: vec![
                ComponentInput::flat(1, dec!(300)),
                ComponentInput::flat(2, dec!(100)),
                ComponentInput::percentage(3, dec!(10)),
                ComponentInput::flat(4, dec!(0)),
            ],
        },
        CreatePolicyCommand {
            policy_number: 2,
            name: "Medium Claim Policy".to_string(),
            components: vec![
                ComponentInput::flat(1, dec!(500)),
                ComponentInput::flat(2, dec!(250)),
                ComponentInput::percentage(3, dec!(12)),
                ComponentInput::flat(4, dec!(50)),
            ],
        },
        CreatePolicyCommand {
            policy_number: 3,
            name: "High Claim Policy".to_string(),
            components: vec![
                ComponentInput::flat(1, dec!(1000)),
                ComponentInput::flat(2, dec!(500)),
                ComponentInput::percentage(3, dec!(45)),
                ComponentInput::flat(4, dec!(120)),
            ],
        },
    ]
}

/// The demo subscriber
pub fn demo_subscriber() -> RegisterSubscriber {
    RegisterSubscriber {
        first_name: "Kwame".to_string(),
        last_name: "Opoku".to_string(),
        email: DEMO_EMAIL.to_string(),
        password: DEMO_PASSWORD.to_string(),
    }
}

/// Seeds each store that is currently empty
pub async fn seed_demo_data(
    policies: &PolicyService,
    subscribers: &SubscriberService,
) -> Result<SeedSummary, SeedError> {
    let mut summary = SeedSummary::default();

    if policies.is_empty().await? {
        for command in demo_policies() {
            policies.create_policy(command).await?;
            summary.policies += 1;
        }
    }

    if subscribers.is_empty().await? {
        subscribers.register(demo_subscriber()).await?;
        summary.subscribers += 1;
    }

    info!(
        policies = summary.policies,
        subscribers = summary.subscribers,
        "Demo data seeding finished"
    );
    Ok(summary)
}
