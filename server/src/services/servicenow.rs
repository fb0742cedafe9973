//! Client for the ServiceNow instance that publishes stadium routes.
//!
//! One attempt per call, bounded by the configured timeout. The reply's
//! `result` array is passed through untouched.

use std::time::Duration;

use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::config::ServiceNowConfig;
use crate::utils::error::{AppError, AppResult};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ServiceNowClient {
    client: Client,
    config: ServiceNowConfig,
}

#[derive(Deserialize)]
struct TableResponse {
    #[serde(default)]
    result: Vec<Value>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ServiceNowClient {
    pub fn new(config: ServiceNowConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout))
            .timeout(config.timeout)
            .user_agent(concat!("matchday-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetches the routes table. Missing credentials fail before any request
    /// is made.
    #[instrument(skip(self))]
    pub async fn fetch_routes(&self) -> AppResult<Vec<Value>> {
        let creds = self.config.credentials()?;
        let url = table_url(creds.instance, &self.config.routes_table);

        let response = self
            .client
            .get(&url)
            .basic_auth(creds.username, Some(creds.password))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AppError::UpstreamError {
                status: e.status().map(|s| s.as_u16()),
                message: if e.is_timeout() {
                    "ServiceNow request timed out".to_string()
                } else {
                    "ServiceNow is unreachable".to_string()
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|error| error.message)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_default();

            return Err(AppError::UpstreamError {
                status: Some(status.as_u16()),
                message: format!("ServiceNow API error: {} {}", status.as_u16(), reason)
                    .trim_end()
                    .to_string(),
            });
        }

        let body: TableResponse = response.json().await.map_err(|_| AppError::UpstreamError {
            status: Some(status.as_u16()),
            message: "ServiceNow returned an unreadable body".to_string(),
        })?;

        info!(count = body.result.len(), "Fetched routes from ServiceNow");
        Ok(body.result)
    }
}

/// `instance` may be a bare host (`dev1234.service-now.com`) or carry its
/// own scheme.
fn table_url(instance: &str, table: &str) -> String {
    let instance = instance.trim().trim_end_matches('/');
    let base = if instance.starts_with("http://") || instance.starts_with("https://") {
        instance.to_string()
    } else {
        format!("https://{instance}")
    };
    format!("{base}/api/now/table/{table}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_defaults_to_https() {
        assert_eq!(
            table_url("dev1234.service-now.com", "x_stadium_routes"),
            "https://dev1234.service-now.com/api/now/table/x_stadium_routes"
        );
    }

    #[test]
    fn test_table_url_keeps_explicit_scheme() {
        assert_eq!(
            table_url("http://127.0.0.1:8080/", "routes"),
            "http://127.0.0.1:8080/api/now/table/routes"
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_request() {
        let client = ServiceNowClient::new(ServiceNowConfig::new(
            Some("unreachable.invalid"),
            Some("api"),
            None,
        ))
        .unwrap();

        let err = client.fetch_routes().await.unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));
    }
}
