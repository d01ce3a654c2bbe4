//! PostgreSQL Adapter Tests
//!
//! Runs the policy service and subscriber store against a real PostgreSQL
//! container. Requires Docker:
//!
//! ```text
//! cargo test -p infra_db -- --ignored
//! ```

use std::sync::Arc;

use core_kernel::{HealthCheckable, PageRequest, PolicyNumber};
use domain_policy::{
    ComponentCatalog, ComponentInput, PolicyError, PolicyService, PolicyStore, Sequence,
    UpdatePolicyCommand,
};
use domain_subscriber::{SubscriberError, SubscriberService};
use infra_db::{PostgresPolicyStore, PostgresSubscriberStore};
use rust_decimal_macros::dec;
use test_utils::{
    assert_component_values, assert_fully_configured, count_rows, create_isolated_test_database,
    CreatePolicyCommandBuilder, PolicyFixtures, SubscriberFixtures,
};

fn number(value: i64) -> PolicyNumber {
    PolicyNumber::new(value).unwrap()
}

mod policy_store_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_create_quote_update_delete_round_trip() {
        let db = create_isolated_test_database().await.unwrap();
        let store = Arc::new(PostgresPolicyStore::new(db.pool().clone()));
        let service = PolicyService::new(store, ComponentCatalog::standard());

        let created = service
            .create_policy(PolicyFixtures::reference_policy(1))
            .await
            .unwrap();
        assert_fully_configured(&created);

        let quote = service
            .calculate_premium(number(1), PolicyFixtures::reference_market_value())
            .await
            .unwrap();
        assert_eq!(quote.premium, PolicyFixtures::reference_premium());

        let updated = service
            .update_policy(
                number(1),
                UpdatePolicyCommand {
                    name: None,
                    components: vec![ComponentInput::flat(2, dec!(75))],
                },
            )
            .await
            .unwrap();
        assert_component_values(&updated, 2, dec!(75), dec!(0));

        let deletion = service.delete_policy(number(1)).await.unwrap();
        assert_eq!(deletion.components_deleted, 4);
        assert_eq!(count_rows(db.pool(), "policies").await.unwrap(), 0);
        assert_eq!(count_rows(db.pool(), "policy_components").await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_duplicate_number_writes_nothing() {
        let db = create_isolated_test_database().await.unwrap();
        let service = PolicyService::new(
            Arc::new(PostgresPolicyStore::new(db.pool().clone())),
            ComponentCatalog::standard(),
        );

        service.create_policy(PolicyFixtures::reference_policy(7)).await.unwrap();
        let err = service
            .create_policy(PolicyFixtures::reference_policy(7))
            .await
            .unwrap_err();

        assert!(matches!(err, PolicyError::DuplicateIdentifier(_)));
        assert_eq!(count_rows(db.pool(), "policy_components").await.unwrap(), 4);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_unchanged_value_reports_no_change() {
        let db = create_isolated_test_database().await.unwrap();
        let store = PostgresPolicyStore::new(db.pool().clone());
        let service = PolicyService::new(Arc::new(store.clone()), ComponentCatalog::standard());
        let created = service
            .create_policy(PolicyFixtures::reference_policy(3))
            .await
            .unwrap();

        let changed = store
            .update_component_value(
                created.id(),
                Sequence::new(1).unwrap(),
                domain_policy::ComponentValue::Flat(dec!(100)),
            )
            .await
            .unwrap();
        assert!(!changed);
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_fine_grained_values_round_trip_exactly() {
        let db = create_isolated_test_database().await.unwrap();
        let service = PolicyService::new(
            Arc::new(PostgresPolicyStore::new(db.pool().clone())),
            ComponentCatalog::standard(),
        );
        let command = CreatePolicyCommandBuilder::new(5)
            .components(vec![
                ComponentInput::flat(1, dec!(100)),
                ComponentInput::percentage(2, dec!(2.33333)),
                ComponentInput::flat(3, dec!(0.00001)),
                ComponentInput::flat(4, dec!(0)),
            ])
            .build();
        service.create_policy(command).await.unwrap();

        let stored = service.get_policy(number(5)).await.unwrap();
        assert_component_values(&stored, 2, dec!(0), dec!(2.33333));
        assert_component_values(&stored, 3, dec!(0.00001), dec!(0));

        let quote = service.calculate_premium(number(5), dec!(100000)).await.unwrap();
        assert_eq!(quote.premium, dec!(2433.33301));

        let err = service
            .update_policy(
                number(5),
                UpdatePolicyCommand {
                    name: None,
                    components: vec![ComponentInput::percentage(2, dec!(2.33333))],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PolicyError::NoEffectiveChange));
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_list_orders_by_number() {
        let db = create_isolated_test_database().await.unwrap();
        let service = PolicyService::new(
            Arc::new(PostgresPolicyStore::new(db.pool().clone())),
            ComponentCatalog::standard(),
        );
        for n in [3, 1, 2] {
            service.create_policy(PolicyFixtures::reference_policy(n)).await.unwrap();
        }

        let page = service
            .list_policies(PageRequest::new(1, 2).unwrap())
            .await
            .unwrap();
        let numbers: Vec<i64> = page.data.iter().map(|p| p.policy_number().value()).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(page.data.iter().all(|p| p.is_fully_configured()));
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_unknown_stored_operation_is_unexpected() {
        let db = create_isolated_test_database().await.unwrap();
        let service = PolicyService::new(
            Arc::new(PostgresPolicyStore::new(db.pool().clone())),
            ComponentCatalog::standard(),
        );
        service.create_policy(PolicyFixtures::reference_policy(4)).await.unwrap();

        sqlx::query("ALTER TABLE policy_components DROP CONSTRAINT policy_components_operation_check")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("UPDATE policy_components SET operation = 'multiply' WHERE sequence = 4")
            .execute(db.pool())
            .await
            .unwrap();

        let err = service.get_policy(number(4)).await.unwrap_err();
        assert!(matches!(err, PolicyError::Unexpected(_)));
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_health_check_round_trips() {
        let db = create_isolated_test_database().await.unwrap();
        let store = PostgresPolicyStore::new(db.pool().clone());
        assert!(store.health_check().await.is_operational());
    }
}

mod subscriber_store_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_register_and_login() {
        let db = create_isolated_test_database().await.unwrap();
        let service = SubscriberService::new(Arc::new(PostgresSubscriberStore::new(db.pool().clone())), 4);

        let registration = SubscriberFixtures::registration();
        let email = registration.email.clone();
        service.register(registration).await.unwrap();

        let subscriber = service
            .authenticate(&email, SubscriberFixtures::PASSWORD)
            .await
            .unwrap();
        assert_eq!(subscriber.email, email.to_lowercase());

        let err = service
            .register(SubscriberFixtures::registration_for(&email))
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriberError::EmailTaken(_)));
    }
}
