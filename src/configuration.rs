//! Configuration management for the mbexport tool.
//!
//! All settings come from the process environment, optionally seeded from a
//! local `.env` file loaded at startup. The configuration is built once and
//! passed to every component that needs it.

use thiserror::Error;
use tracing::debug;
use url::Url;

/// Environment variable holding the base URL of the Metabase instance
pub const ENV_HOST: &str = "MBEXPORT_HOST";
/// Environment variable holding the login username
pub const ENV_USER: &str = "MBEXPORT_USER";
/// Environment variable holding the login password
pub const ENV_PASSWORD: &str = "MBEXPORT_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("missing value for required environment variable {name:?}")]
    MissingRequiredPropertyValue { name: String },
    #[error("invalid host URL {value:?}: {cause}")]
    InvalidHostUrl {
        value: String,
        cause: url::ParseError,
    },
}

/// Connection settings for one Metabase instance
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    host: String,
    username: String,
    password: String,
}

impl Configuration {
    /// Build a configuration from explicit values.
    ///
    /// The host must be an absolute URL; a trailing slash is trimmed so that
    /// API paths and item links can be appended verbatim.
    pub fn new(
        host: String,
        username: String,
        password: String,
    ) -> Result<Configuration, ConfigurationError> {
        let host = host.trim();
        let parsed = Url::parse(host).map_err(|cause| ConfigurationError::InvalidHostUrl {
            value: host.to_string(),
            cause,
        })?;
        debug!("Using Metabase instance at {}", parsed);

        Ok(Configuration {
            host: host.trim_end_matches('/').to_string(),
            username,
            password,
        })
    }

    /// Load the configuration from the process environment.
    pub fn load_from_env() -> Result<Configuration, ConfigurationError> {
        let host = required_property(ENV_HOST)?;
        let username = required_property(ENV_USER)?;
        let password = required_property(ENV_PASSWORD)?;

        Configuration::new(host, username, password)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Read one environment variable, treating an unset or empty value as missing
fn required_property(name: &str) -> Result<String, ConfigurationError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigurationError::MissingRequiredPropertyValue {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_trims_trailing_slash() {
        let configuration = Configuration::new(
            "https://metabase.example.com/".to_string(),
            "admin".to_string(),
            "secret".to_string(),
        )
        .unwrap();

        assert_eq!(configuration.host(), "https://metabase.example.com");
        assert_eq!(configuration.username(), "admin");
        assert_eq!(configuration.password(), "secret");
    }

    #[test]
    fn test_configuration_rejects_invalid_host() {
        let result = Configuration::new(
            "not a url".to_string(),
            "admin".to_string(),
            "secret".to_string(),
        );

        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidHostUrl { .. })
        ));
    }

    #[test]
    fn test_configuration_keeps_path_prefix() {
        let configuration = Configuration::new(
            "https://bi.example.com/metabase".to_string(),
            "admin".to_string(),
            "secret".to_string(),
        )
        .unwrap();

        assert_eq!(configuration.host(), "https://bi.example.com/metabase");
    }
}
