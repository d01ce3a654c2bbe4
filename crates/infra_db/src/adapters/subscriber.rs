//! PostgreSQL Subscriber Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, SubscriberId};
use domain_subscriber::{NewSubscriber, Subscriber, SubscriberStore};

use crate::repositories::subscriber::{SubscriberRepository, SubscriberRow};

const ADAPTER_ID: &str = "postgres-subscriber-store";

/// PostgreSQL-backed implementation of `SubscriberStore`
#[derive(Debug, Clone)]
pub struct PostgresSubscriberStore {
    repository: SubscriberRepository,
    pool: PgPool,
}

impl PostgresSubscriberStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SubscriberRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresSubscriberStore {}

#[async_trait]
impl HealthCheckable for PostgresSubscriberStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, ADAPTER_ID).await
    }
}

#[async_trait]
impl SubscriberStore for PostgresSubscriberStore {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, PortError> {
        Ok(self.repository.find_by_email(email).await?.map(row_to_subscriber))
    }

    #[instrument(skip(self, subscriber), fields(email = %subscriber.email))]
    async fn create(&self, subscriber: NewSubscriber) -> Result<Subscriber, PortError> {
        let row = self
            .repository
            .insert(
                Uuid::now_v7(),
                &subscriber.first_name,
                &subscriber.last_name,
                &subscriber.email,
                &subscriber.password_hash,
            )
            .await?;
        Ok(row_to_subscriber(row))
    }

    async fn count(&self) -> Result<u64, PortError> {
        let count = self.repository.count().await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

fn row_to_subscriber(row: SubscriberRow) -> Subscriber {
    Subscriber {
        id: SubscriberId::from_uuid(row.id),
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        password_hash: row.password_hash,
        created_at: row.created_at,
    }
}
