//! API configuration

use serde::Deserialize;

use domain_contact::HubSpotConfig;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Service name reported by the index endpoint
    pub app_name: String,
    /// HubSpot private-app access token
    pub hubspot_access_token: String,
    /// HubSpot REST API base URL
    pub hubspot_base_url: String,
    /// HubSpot web app base URL, used for contact links
    pub hubspot_app_url: String,
    /// Timeout applied to every HubSpot request, in seconds
    pub hubspot_timeout_secs: u64,
    /// Log level
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let hubspot = HubSpotConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            app_name: "CRM Integration API".to_string(),
            hubspot_access_token: String::new(),
            hubspot_base_url: hubspot.base_url,
            hubspot_app_url: hubspot.app_url,
            hubspot_timeout_secs: hubspot.timeout_secs,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `CRM_`-prefixed environment variables
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CRM").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Rejects settings the server cannot run with
    ///
    /// An access token is required and the upstream timeout must be at
    /// least one second.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.hubspot_access_token.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "CRM_HUBSPOT_ACCESS_TOKEN (or HUBSPOT_ACCESS_TOKEN) must be set".to_string(),
            ));
        }
        if self.hubspot_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "CRM_HUBSPOT_TIMEOUT_SECS (or HUBSPOT_TIMEOUT) must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the upstream adapter configuration
    pub fn hubspot_config(&self) -> HubSpotConfig {
        HubSpotConfig {
            base_url: self.hubspot_base_url.clone(),
            app_url: self.hubspot_app_url.clone(),
            access_token: self.hubspot_access_token.clone(),
            timeout_secs: self.hubspot_timeout_secs,
        }
    }
}
