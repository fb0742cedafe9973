use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::utils::error::AppError;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";
pub const DEFAULT_ROUTES_TABLE: &str = "x_stadium_routes";
pub const DEFAULT_SERVICENOW_TIMEOUT_SECS: u64 = 10;

pub struct Config {
    pub bind_addr: SocketAddr,
    pub seed_sample_data: bool,
    pub cors_allowed_origins: String,
    pub production: bool,
    pub servicenow: ServiceNowConfig,
}

/// Connection settings for the ServiceNow routing collaborator. Any of the
/// three credentials may be absent; the proxy checks on every call.
#[derive(Clone)]
pub struct ServiceNowConfig {
    pub instance: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub routes_table: String,
    pub timeout: Duration,
}

/// Borrowed, fully present credential set.
pub struct ServiceNowCredentials<'a> {
    pub instance: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: parse_or("BIND_ADDR", default_bind_addr()),
            seed_sample_data: parse_or("SEED_SAMPLE_DATA", true),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
            production: env::var("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
            servicenow: ServiceNowConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            seed_sample_data: false,
            cors_allowed_origins: DEFAULT_ALLOWED_ORIGINS.to_string(),
            production: false,
            servicenow: ServiceNowConfig::default(),
        }
    }
}

impl Default for ServiceNowConfig {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

impl ServiceNowConfig {
    pub fn from_env() -> Self {
        Self {
            instance: non_empty_var("SERVICENOW_INSTANCE"),
            username: non_empty_var("SERVICENOW_USERNAME"),
            password: non_empty_var("SERVICENOW_PASSWORD").map(SecretString::from),
            routes_table: env::var("SERVICENOW_ROUTES_TABLE")
                .unwrap_or_else(|_| DEFAULT_ROUTES_TABLE.to_string()),
            timeout: Duration::from_secs(parse_or(
                "SERVICENOW_TIMEOUT_SECS",
                DEFAULT_SERVICENOW_TIMEOUT_SECS,
            )),
        }
    }

    pub fn new(
        instance: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Self {
        Self {
            instance: instance.map(str::to_string),
            username: username.map(str::to_string),
            password: password.map(|p| SecretString::from(p.to_string())),
            routes_table: DEFAULT_ROUTES_TABLE.to_string(),
            timeout: Duration::from_secs(DEFAULT_SERVICENOW_TIMEOUT_SECS),
        }
    }

    /// All three settings, or a configuration error naming what is missing.
    pub fn credentials(&self) -> Result<ServiceNowCredentials<'_>, AppError> {
        let instance = self.instance.as_deref().filter(|v| !v.trim().is_empty());
        let username = self.username.as_deref().filter(|v| !v.trim().is_empty());
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret())
            .filter(|v| !v.is_empty());

        match (instance, username, password) {
            (Some(instance), Some(username), Some(password)) => Ok(ServiceNowCredentials {
                instance,
                username,
                password,
            }),
            (instance, username, password) => {
                let missing: Vec<&str> = [
                    ("SERVICENOW_INSTANCE", instance.is_none()),
                    ("SERVICENOW_USERNAME", username.is_none()),
                    ("SERVICENOW_PASSWORD", password.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();

                Err(AppError::ConfigurationError(format!(
                    "ServiceNow integration is not configured (missing {})",
                    missing.join(", ")
                )))
            }
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3001))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Config: invalid value for {}: '{}', using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_credentials() {
        let config = ServiceNowConfig::new(Some("dev1234.service-now.com"), Some("api"), Some("pw"));
        let creds = config.credentials().unwrap();
        assert_eq!(creds.instance, "dev1234.service-now.com");
        assert_eq!(creds.username, "api");
        assert_eq!(creds.password, "pw");
    }

    #[test]
    fn test_any_missing_credential_is_a_configuration_error() {
        let cases = [
            ServiceNowConfig::new(None, Some("api"), Some("pw")),
            ServiceNowConfig::new(Some("host"), None, Some("pw")),
            ServiceNowConfig::new(Some("host"), Some("api"), None),
            ServiceNowConfig::new(Some("host"), Some("  "), Some("pw")),
        ];

        for config in cases {
            match config.credentials() {
                Err(AppError::ConfigurationError(msg)) => {
                    assert!(msg.contains("not configured"), "{msg}")
                }
                _ => panic!("expected configuration error"),
            }
        }
    }

    #[test]
    fn test_missing_message_names_the_variable() {
        let config = ServiceNowConfig::new(Some("host"), Some("api"), None);
        let Err(AppError::ConfigurationError(msg)) = config.credentials() else {
            panic!("expected configuration error");
        };
        assert!(msg.contains("SERVICENOW_PASSWORD"));
        assert!(!msg.contains("SERVICENOW_USERNAME"));
    }
}
