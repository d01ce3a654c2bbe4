//! Authentication
//!
//! Subscribers log in with email and password and receive an HS256 JWT. The
//! token names the subscriber and is bound to the configured issuer and
//! audience.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use domain_subscriber::Subscriber;

use crate::config::ApiConfig;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (subscriber ID)
    pub sub: String,
    /// Subscriber's first name
    pub name: String,
    /// Subscriber's email
    pub email: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or malformed Authorization header")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token could not be created: {0}")]
    TokenCreation(String),
}

/// Creates a signed token for a subscriber
///
/// # Arguments
///
/// * `subscriber` - The authenticated subscriber
/// * `config` - Supplies secret, issuer, audience and lifetime
pub fn create_token(subscriber: &Subscriber, config: &ApiConfig) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(config.jwt_expiration_secs as i64);

    let claims = Claims {
        sub: subscriber.id.as_uuid().to_string(),
        name: subscriber.first_name.clone(),
        email: subscriber.email.clone(),
        iss: config.jwt_issuer.clone(),
        aud: config.jwt_audience.clone(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenCreation(e.to_string()))
}

/// Validates a token's signature, expiry, issuer and audience
pub fn validate_token(token: &str, config: &ApiConfig) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.jwt_issuer.as_str()]);
    validation.set_audience(&[config.jwt_audience.as_str()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Extracts the token from a `Bearer` Authorization header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::SubscriberId;

    fn subscriber() -> Subscriber {
        Subscriber {
            id: SubscriberId::new(),
            first_name: "Kwame".to_string(),
            last_name: "Opoku".to_string(),
            email: "test@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = ApiConfig::default();
        let subscriber = subscriber();

        let token = create_token(&subscriber, &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();

        assert_eq!(claims.sub, subscriber.id.as_uuid().to_string());
        assert_eq!(claims.name, "Kwame");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let config = ApiConfig::default();
        let token = create_token(&subscriber(), &config).unwrap();

        let other = ApiConfig {
            jwt_audience: "someone-else".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(validate_token(&token, &other), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(&subscriber(), &ApiConfig::default()).unwrap();
        let other = ApiConfig {
            jwt_secret: "another-secret".to_string(),
            ..ApiConfig::default()
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")).unwrap(), "abc");
        assert!(bearer_token(Some("Basic abc")).is_err());
        assert!(bearer_token(Some("Bearer ")).is_err());
        assert!(bearer_token(None).is_err());
    }
}
