//! Subscriber Domain Ports
//!
//! `SubscriberStore` is the storage port for subscribers. The PostgreSQL
//! adapter lives in `infra_db`; an in-memory adapter lives in [`memory`].

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError};

use crate::subscriber::{NewSubscriber, Subscriber};

/// Storage port for subscribers
#[async_trait]
pub trait SubscriberStore: DomainPort + HealthCheckable {
    /// Finds a subscriber by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, PortError>;

    /// Inserts a subscriber
    ///
    /// # Errors
    ///
    /// Returns `PortError::Conflict` if the email is already registered
    async fn create(&self, subscriber: NewSubscriber) -> Result<Subscriber, PortError>;

    /// Returns the number of registered subscribers
    async fn count(&self) -> Result<u64, PortError>;
}

/// In-memory implementation of [`SubscriberStore`]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult, SubscriberId};
    use tokio::sync::RwLock;

    /// Subscriber store keyed by email
    #[derive(Debug, Default, Clone)]
    pub struct InMemorySubscriberStore {
        subscribers: Arc<RwLock<HashMap<String, Subscriber>>>,
    }

    impl InMemorySubscriberStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for InMemorySubscriberStore {}

    #[async_trait]
    impl HealthCheckable for InMemorySubscriberStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "memory-subscriber-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl SubscriberStore for InMemorySubscriberStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, PortError> {
            Ok(self.subscribers.read().await.get(email).cloned())
        }

        async fn create(&self, subscriber: NewSubscriber) -> Result<Subscriber, PortError> {
            let mut subscribers = self.subscribers.write().await;
            if subscribers.contains_key(&subscriber.email) {
                return Err(PortError::conflict(format!(
                    "email {} already registered",
                    subscriber.email
                )));
            }

            let stored = Subscriber {
                id: SubscriberId::new_v7(),
                first_name: subscriber.first_name,
                last_name: subscriber.last_name,
                email: subscriber.email,
                password_hash: subscriber.password_hash,
                created_at: Utc::now(),
            };
            subscribers.insert(stored.email.clone(), stored.clone());
            Ok(stored)
        }

        async fn count(&self) -> Result<u64, PortError> {
            Ok(self.subscribers.read().await.len() as u64)
        }
    }
}
