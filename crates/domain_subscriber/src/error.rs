//! Subscriber domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the subscriber domain
#[derive(Debug, Error)]
pub enum SubscriberError {
    /// The email address belongs to an existing subscriber
    #[error("A subscriber with email {0} already exists")]
    EmailTaken(String),

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registration data failed validation
    #[error("Invalid subscriber data: {0}")]
    Validation(String),

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Storage or infrastructure failure
    #[error("Unexpected failure: {0}")]
    Unexpected(#[from] PortError),
}

impl SubscriberError {
    /// Creates a Validation error with a message
    pub fn validation(message: impl Into<String>) -> Self {
        SubscriberError::Validation(message.into())
    }
}

impl From<validator::ValidationErrors> for SubscriberError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SubscriberError::Validation(errors.to_string())
    }
}

impl From<bcrypt::BcryptError> for SubscriberError {
    fn from(error: bcrypt::BcryptError) -> Self {
        SubscriberError::Hashing(error.to_string())
    }
}
