//! Subscriber Service Tests
//!
//! Registration and login over the in-memory store. A low bcrypt cost keeps
//! these fast.

use std::sync::Arc;

use domain_subscriber::memory::InMemorySubscriberStore;
use domain_subscriber::{RegisterSubscriber, SubscriberError, SubscriberService};

const TEST_COST: u32 = 4;

fn service() -> SubscriberService {
    SubscriberService::new(Arc::new(InMemorySubscriberStore::new()), TEST_COST)
}

fn registration(email: &str) -> RegisterSubscriber {
    RegisterSubscriber {
        first_name: "Kwame".to_string(),
        last_name: "Opoku".to_string(),
        email: email.to_string(),
        password: "kwamepassword".to_string(),
    }
}

mod register_tests {
    use super::*;

    #[tokio::test]
    async fn test_register_hashes_password() {
        let service = service();
        let subscriber = service.register(registration("test@example.com")).await.unwrap();

        assert_eq!(subscriber.email, "test@example.com");
        assert_ne!(subscriber.password_hash, "kwamepassword");
        assert!(subscriber.password_hash.starts_with("$2"));
        assert_eq!(subscriber.full_name(), "Kwame Opoku");
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let service = service();
        let subscriber = service.register(registration(" Test@Example.com ")).await.unwrap();
        assert_eq!(subscriber.email, "test@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let service = service();
        service.register(registration("test@example.com")).await.unwrap();

        let err = service
            .register(registration("TEST@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriberError::EmailTaken(_)));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let service = service();
        let mut input = registration("test@example.com");
        input.password = "1234567".to_string();

        let err = service.register(input).await.unwrap_err();
        assert!(matches!(err, SubscriberError::Validation(_)));
        assert!(service.is_empty().await.unwrap());
    }

    #[test]
    fn test_hash_is_not_serialized() {
        let subscriber = domain_subscriber::Subscriber {
            id: core_kernel::SubscriberId::new(),
            first_name: "Ama".to_string(),
            last_name: "Mensah".to_string(),
            email: "ama@example.com".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            created_at: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&subscriber).unwrap();
        assert!(!json.contains("secret"));
    }
}

mod login_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_with_correct_password() {
        let service = service();
        let registered = service.register(registration("test@example.com")).await.unwrap();

        let subscriber = service
            .authenticate("test@example.com", "kwamepassword")
            .await
            .unwrap();
        assert_eq!(subscriber.id, registered.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let service = service();
        service.register(registration("test@example.com")).await.unwrap();

        let wrong = service
            .authenticate("test@example.com", "wrongpassword")
            .await
            .unwrap_err();
        let unknown = service
            .authenticate("nobody@example.com", "kwamepassword")
            .await
            .unwrap_err();

        assert!(matches!(wrong, SubscriberError::InvalidCredentials));
        assert!(matches!(unknown, SubscriberError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }
}
