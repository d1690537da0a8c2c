//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Portal configuration, established once at startup and immutable after.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Port the portal binds to.
    pub port: u16,
    /// Base URL of the connector service.
    pub connector_url: String,
    /// Base URL of the webhooks service.
    pub webhooks_url: String,
    /// Base URL of the Stripe API.
    pub stripe_url: String,
    /// Stripe secret API key.
    pub stripe_api_key: Option<SecretString>,
    /// Timeout applied to every outbound call.
    pub request_timeout: Duration,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            port: 9400,
            connector_url: "http://localhost:9300".to_string(),
            webhooks_url: "http://localhost:9008".to_string(),
            stripe_url: "https://api.stripe.com".to_string(),
            stripe_api_key: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl PortalConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// Recognised variables: `PORTAL_PORT`, `CONNECTOR_URL`, `WEBHOOKS_URL`,
    /// `STRIPE_URL`, `STRIPE_API_KEY`, `PORTAL_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match std::env::var("PORTAL_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORTAL_PORT".to_string(),
                message: format!("{raw} is not a valid port"),
            })?,
            Err(_) => defaults.port,
        };

        let request_timeout = match std::env::var("PORTAL_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "PORTAL_REQUEST_TIMEOUT_SECS".to_string(),
                    message: format!("{raw} is not a number of seconds"),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => defaults.request_timeout,
        };

        Ok(Self {
            port,
            connector_url: std::env::var("CONNECTOR_URL").unwrap_or(defaults.connector_url),
            webhooks_url: std::env::var("WEBHOOKS_URL").unwrap_or(defaults.webhooks_url),
            stripe_url: std::env::var("STRIPE_URL").unwrap_or(defaults.stripe_url),
            stripe_api_key: std::env::var("STRIPE_API_KEY").ok().map(SecretString::from),
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PortalConfig::default();
        assert_eq!(config.port, 9400);
        assert_eq!(config.connector_url, "http://localhost:9300");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.stripe_api_key.is_none());
    }
}
