//! Subscriber services
//!
//! Registration and credential verification. Hashing runs on the blocking
//! thread pool since bcrypt is deliberately slow.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use validator::Validate;

use crate::error::SubscriberError;
use crate::ports::SubscriberStore;
use crate::subscriber::{normalize_email, NewSubscriber, RegisterSubscriber, Subscriber};

/// Registers subscribers and verifies their credentials
pub struct SubscriberService {
    store: Arc<dyn SubscriberStore>,
    bcrypt_cost: u32,
}

impl SubscriberService {
    /// Creates a service using the given bcrypt work factor
    pub fn new(store: Arc<dyn SubscriberStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    /// Returns the underlying store, e.g. for health checks
    pub fn store(&self) -> &Arc<dyn SubscriberStore> {
        &self.store
    }

    /// Registers a new subscriber
    ///
    /// # Errors
    ///
    /// - `Validation` for a malformed email, empty names, or a short password
    /// - `EmailTaken` if the email is already registered
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, mut input: RegisterSubscriber) -> Result<Subscriber, SubscriberError> {
        input.email = normalize_email(&input.email);
        input.first_name = input.first_name.trim().to_string();
        input.last_name = input.last_name.trim().to_string();
        input.validate()?;
        let email = input.email.clone();

        if self.store.find_by_email(&email).await?.is_some() {
            warn!("Registration rejected: email already in use");
            return Err(SubscriberError::EmailTaken(email));
        }

        let password_hash = self.hash_password(input.password).await?;
        let subscriber = self
            .store
            .create(NewSubscriber {
                first_name: input.first_name,
                last_name: input.last_name,
                email: email.clone(),
                password_hash,
            })
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    SubscriberError::EmailTaken(email.clone())
                } else {
                    SubscriberError::Unexpected(e)
                }
            })?;

        info!(subscriber_id = %subscriber.id, "Subscriber registered");
        Ok(subscriber)
    }

    /// Verifies an email/password pair
    ///
    /// Unknown emails and wrong passwords both yield `InvalidCredentials`.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Subscriber, SubscriberError> {
        let Some(subscriber) = self.store.find_by_email(&normalize_email(email)).await? else {
            warn!("Login rejected");
            return Err(SubscriberError::InvalidCredentials);
        };

        let password = password.to_string();
        let hash = subscriber.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| SubscriberError::Hashing(e.to_string()))??;

        if !verified {
            warn!("Login rejected");
            return Err(SubscriberError::InvalidCredentials);
        }

        info!(subscriber_id = %subscriber.id, "Subscriber authenticated");
        Ok(subscriber)
    }

    /// Returns true if no subscribers are registered
    pub async fn is_empty(&self) -> Result<bool, SubscriberError> {
        Ok(self.store.count().await? == 0)
    }

    async fn hash_password(&self, password: String) -> Result<String, SubscriberError> {
        let cost = self.bcrypt_cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| SubscriberError::Hashing(e.to_string()))??;
        Ok(hash)
    }
}
