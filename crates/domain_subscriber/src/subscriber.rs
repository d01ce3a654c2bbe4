//! Subscriber entity and registration input
//!
//! A subscriber is an API user allowed to manage policies and request quotes.
//! Only the bcrypt hash of the password is ever stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::SubscriberId;

/// A registered API user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub first_name: String,
    pub last_name: String,
    /// Normalized (trimmed, lowercase) email address
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Subscriber {
    /// Returns "first last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration input, validated before any hashing or storage
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterSubscriber {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Data for inserting a subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriber {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Trims and lowercases an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegisterSubscriber {
        RegisterSubscriber {
            first_name: "Kwame".to_string(),
            last_name: "Opoku".to_string(),
            email: "test@example.com".to_string(),
            password: "kwamepassword".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut input = registration();
        input.password = "short".to_string();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut input = registration();
        input.email = "not-an-email".to_string();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Test@Example.COM "), "test@example.com");
    }
}
