//! Configuration module for the Analytics Engine client.
//!
//! Configuration is passed programmatically: an authorization credential and
//! the base URL of the Analytics Engine instance. Validation turns the raw
//! strings into a parsed base URL before any request is made.

use thiserror::Error;
use url::Url;

/// Errors raised while building an [`AnalyticsClient`](crate::AnalyticsClient).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The authorization credential was empty.
    #[error("Authorization is required.")]
    MissingAuthorization,

    /// The authorization credential cannot be sent as a header value.
    #[error("Invalid authorization: {0}")]
    InvalidAuthorization(String),

    /// The instance URL was empty.
    #[error("Instance URL is required.")]
    MissingInstanceUrl,

    /// The instance URL is not an absolute URL with a host.
    #[error("Invalid instance URL '{url}': {reason}")]
    InvalidInstanceUrl { url: String, reason: String },

    /// The reachability probe failed or returned a non-200 status.
    #[error("Invalid instance URL '{url}': {reason}")]
    Unreachable { url: String, reason: String },

    /// The instance answered the probe with an error payload.
    #[error("{0}")]
    Instance(String),

    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Connection settings for an Analytics Engine instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Value sent verbatim in the `Authorization` header
    pub authorization: String,

    /// Base URL of the instance, e.g. `https://analytics.example.com`
    pub instance_url: String,
}

impl ClientConfig {
    /// Create a new config from a credential and an instance URL.
    pub fn new(authorization: impl Into<String>, instance_url: impl Into<String>) -> Self {
        Self {
            authorization: authorization.into(),
            instance_url: instance_url.into(),
        }
    }

    /// Validate the config and return the parsed base URL.
    ///
    /// Surrounding whitespace is ignored on both fields and a trailing `/` on
    /// the instance URL is dropped, so `https://host/` and `https://host`
    /// address the same endpoints.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - the authorization credential is empty
    /// - the instance URL is empty
    /// - the instance URL is not absolute or has no host
    ///
    /// # Examples
    ///
    /// ```
    /// use analytics_engine_client::config::ClientConfig;
    ///
    /// let config = ClientConfig::new("secret", "https://analytics.example.com/");
    /// let base = config.validate().expect("valid config");
    /// assert_eq!(base.as_str(), "https://analytics.example.com/");
    /// ```
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if self.authorization.trim().is_empty() {
            return Err(ConfigError::MissingAuthorization);
        }

        let raw = self.instance_url.trim();
        if raw.is_empty() {
            return Err(ConfigError::MissingInstanceUrl);
        }

        let trimmed = raw.trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidInstanceUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidInstanceUrl {
                url: raw.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(url),
            _ => Err(ConfigError::InvalidInstanceUrl {
                url: raw.to_string(),
                reason: "missing host".to_string(),
            }),
        }
    }

    /// The credential with surrounding whitespace removed.
    pub fn authorization(&self) -> &str {
        self.authorization.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = ClientConfig::new("secret", "http://localhost:8080");
        let url = config.validate().expect("Should validate");
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_trailing_slash_removed() {
        let config = ClientConfig::new("secret", "https://analytics.example.com/engine/");
        let url = config.validate().expect("Should validate");
        assert_eq!(url.path(), "/engine");
    }

    #[test]
    fn test_empty_authorization() {
        let config = ClientConfig::new("", "http://localhost:8080");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingAuthorization)
        ));

        let config = ClientConfig::new("   ", "http://localhost:8080");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingAuthorization)
        ));
    }

    #[test]
    fn test_empty_instance_url() {
        let config = ClientConfig::new("secret", "");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingInstanceUrl)
        ));
    }

    #[test]
    fn test_unparseable_instance_url() {
        let config = ClientConfig::new("secret", "not a url");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInstanceUrl { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_relative_instance_url() {
        let config = ClientConfig::new("secret", "/analytics");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInstanceUrl { .. })
        ));
    }

    #[test]
    fn test_instance_url_without_host() {
        let config = ClientConfig::new("secret", "mailto:ops@example.com");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInstanceUrl { .. })
        ));

        let config = ClientConfig::new("secret", "file:///tmp/engine");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInstanceUrl { .. })
        ));
    }

    #[test]
    fn test_authorization_trimmed() {
        let config = ClientConfig::new(" secret \n", "http://localhost:8080");
        assert_eq!(config.authorization(), "secret");
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::MissingInstanceUrl.to_string(),
            "Instance URL is required."
        );
        assert_eq!(
            ConfigError::Instance("maintenance".to_string()).to_string(),
            "maintenance"
        );

        let err = ConfigError::Unreachable {
            url: "http://localhost:1".to_string(),
            reason: "status 502".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid instance URL 'http://localhost:1': status 502"
        );
    }
}
