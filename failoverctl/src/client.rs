//! HTTP client for the Robot failover endpoints.

use async_trait::async_trait;
use failover_core::api::{self, ACTIVE_SERVER_FIELD};
use failover_core::{Credentials, FailoverError, FailoverRecord, Result};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, warn};

/// Normalize a server URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Operations the CLI needs from the failover service.
///
/// [`FailoverClient`] talks to the real API; tests substitute recording
/// implementations.
#[async_trait]
pub trait FailoverApi: Send + Sync {
    /// `GET /failover`
    async fn list_failovers(&self) -> Result<Vec<FailoverRecord>>;

    /// `GET /failover/{address}`
    async fn get_failover(&self, address: &str) -> Result<FailoverRecord>;

    /// `POST /failover/{address}` with `active_server_ip={active_server}`
    async fn update_failover(&self, address: &str, active_server: &str)
        -> Result<FailoverRecord>;
}

/// Robot API client.
///
/// Every request carries HTTP basic auth and is bounded by the configured
/// timeout. Requests are never retried.
///
/// # Examples
///
/// ```no_run
/// use failoverctl::client::{FailoverApi, FailoverClient};
/// use failover_core::Credentials;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = FailoverClient::new(
///     "https://robot-ws.your-server.de",
///     30,
///     Credentials::new("#ws+user", "secret"),
/// )?;
///
/// for record in client.list_failovers().await? {
///     println!("{} -> {}", record.address, record.active_server_address);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FailoverClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl FailoverClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the API (e.g., "https://robot-ws.your-server.de")
    /// * `timeout_secs` - Request timeout in seconds
    /// * `credentials` - Basic-auth login and password
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: &str, timeout_secs: u64, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("failoverctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FailoverError::Config(format!("cannot create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: normalize_url(base_url),
            credentials,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(address: Option<&str>) -> String {
        match address {
            Some(address) => format!("/failover/{}", address.trim()),
            None => "/failover".to_string(),
        }
    }

    /// Send a request and return the body of a successful response.
    ///
    /// # Errors
    ///
    /// - [`FailoverError::Transport`] when no response arrives
    /// - [`FailoverError::Api`] for a non-success status
    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<String> {
        let response = request
            .basic_auth(&self.credentials.login, Some(&self.credentials.password))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FailoverError::Transport(format!("request to {} timed out", endpoint))
                } else {
                    FailoverError::Transport(format!("request to {} failed: {}", endpoint, e))
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            FailoverError::Transport(format!("failed to read response from {}: {}", endpoint, e))
        })?;
        debug!("{} answered {}", endpoint, status);

        if !status.is_success() {
            return Err(api::error_from_response(status.as_u16(), &text));
        }

        Ok(text)
    }
}

#[async_trait]
impl FailoverApi for FailoverClient {
    async fn list_failovers(&self) -> Result<Vec<FailoverRecord>> {
        let endpoint = Self::endpoint(None);
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let body = self.send(self.client.get(&url), &endpoint).await?;
        api::decode_records(&body)
    }

    async fn get_failover(&self, address: &str) -> Result<FailoverRecord> {
        let endpoint = Self::endpoint(Some(address));
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let body = self.send(self.client.get(&url), &endpoint).await?;
        api::decode_record(&body)
    }

    async fn update_failover(
        &self,
        address: &str,
        active_server: &str,
    ) -> Result<FailoverRecord> {
        let endpoint = Self::endpoint(Some(address));
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("POST {} {}={}", url, ACTIVE_SERVER_FIELD, active_server);

        let request = self
            .client
            .post(&url)
            .form(&[(ACTIVE_SERVER_FIELD, active_server.trim())]);
        let body = self.send(request, &endpoint).await?;
        let record = api::decode_record(&body)?;

        if !failover_core::duty::same_address(&record.address, address) {
            warn!(
                "Update of {} returned record for {}",
                address.trim(),
                record.address
            );
        }

        Ok(record)
    }
}
