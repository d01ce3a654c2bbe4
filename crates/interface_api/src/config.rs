//! API configuration

use serde::Deserialize;

/// API configuration
///
/// Loaded from `API_`-prefixed environment variables; anything unset keeps
/// its default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT signing secret
    pub jwt_secret: String,
    /// `iss` claim written to and required on tokens
    pub jwt_issuer: String,
    /// `aud` claim written to and required on tokens
    pub jwt_audience: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// PostgreSQL URL; the in-memory stores are used when absent
    pub database_url: Option<String>,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Insert the demo policies and subscriber into empty stores at startup
    pub seed_demo_data: bool,
    /// bcrypt work factor for subscriber passwords
    pub bcrypt_cost: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_issuer: "policy-api".to_string(),
            jwt_audience: "policy-api-subscribers".to_string(),
            jwt_expiration_secs: 24 * 60 * 60,
            database_url: None,
            log_level: "info".to_string(),
            log_json: false,
            seed_demo_data: true,
            bcrypt_cost: 12,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    ///
    /// `DATABASE_URL` is honoured when `API_DATABASE_URL` is not set.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let mut config: ApiConfig = config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if config.database_url.is_none() {
            config.database_url = std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        }

        Ok(config)
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.jwt_expiration_secs, 86_400);
        assert!(config.database_url.is_none());
        assert!(config.seed_demo_data);
    }
}
