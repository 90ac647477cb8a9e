//! CLI configuration management
//!
//! Combines built-in defaults, the credential file, environment variables
//! and command-line flags into a validated [`CliConfig`].

use anyhow::Result;
use failover_core::{CredentialFile, Credentials, FailoverError, DEFAULT_API_URL};
use std::path::PathBuf;
use tracing::debug;

/// Environment variable overriding the API base URL
pub const ENV_URL: &str = "HETZNER_API_URL";
/// Environment variable overriding the request timeout
pub const ENV_TIMEOUT: &str = "HETZNER_TIMEOUT";
/// Environment variable overriding the output format
pub const ENV_FORMAT: &str = "HETZNER_FORMAT";
/// Environment variable overriding the verbose flag
pub const ENV_VERBOSE: &str = "HETZNER_VERBOSE";
/// Environment variable overriding the tracked failover address
pub const ENV_FAILOVER_IP: &str = "HETZNER_FAILOVER_IP";
/// Environment variable overriding the local address
pub const ENV_LOCAL_IP: &str = "HETZNER_LOCAL_IP";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;

/// CLI configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Output format: plain, table or json
    pub output_format: String,

    /// Enable verbose logging
    pub verbose: bool,

    /// Basic-auth credentials
    pub credentials: Credentials,

    /// Failover address to act on or track when no `-f` is given
    pub failover_ip: Option<String>,

    /// Address of this machine, for duty comparison
    pub local_ip: Option<String>,

    /// Credential file the configuration was read from
    pub credentials_path: PathBuf,
}

impl CliConfig {
    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Credential file
/// 3. Environment variables
/// 4. CLI arguments
///
/// Apply the layers in that order; each later layer overwrites what it sets.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    base_url: Option<String>,
    output_format: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
    failover_ip: Option<String>,
    local_ip: Option<String>,
    credentials: Option<CredentialFile>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set API base URL (with validation)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        Self::validate_url(&url)?;
        self.base_url = Some(url);
        Ok(self)
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Set the tracked failover address
    pub fn with_failover_ip(mut self, ip: impl Into<String>) -> Self {
        self.failover_ip = Some(ip.into());
        self
    }

    /// Set the local address
    pub fn with_local_ip(mut self, ip: impl Into<String>) -> Self {
        self.local_ip = Some(ip.into());
        self
    }

    /// Load credentials and defaults from the first usable file in `paths`
    ///
    /// # Errors
    ///
    /// Returns a credentials error if no file yields credentials, or a
    /// configuration error if the file's `url` is invalid.
    pub fn with_credential_file(mut self, paths: &[PathBuf]) -> Result<Self> {
        let file = CredentialFile::load_first(paths)?;

        if let Some(url) = &file.url {
            Self::validate_url(url)?;
            self.base_url = Some(url.clone());
        }
        if let Some(ip) = &file.failover_ip {
            self.failover_ip = Some(ip.clone());
        }
        if let Some(ip) = &file.local_ip {
            self.local_ip = Some(ip.clone());
        }

        debug!("Using credentials from {}", file.path.display());
        self.credentials = Some(file);
        Ok(self)
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_URL) {
            // Validate before applying
            if Self::validate_url(&url).is_ok() {
                self.base_url = Some(url);
            }
        }

        if let Ok(format) = std::env::var(ENV_FORMAT) {
            if Self::validate_output_format(&format).is_ok() {
                self.output_format = Some(format);
            }
        }

        if let Ok(verbose) = std::env::var(ENV_VERBOSE) {
            self.verbose = Some(verbose.to_lowercase() == "true" || verbose == "1");
        }

        if let Ok(timeout) = std::env::var(ENV_TIMEOUT) {
            if let Ok(timeout) = timeout.parse() {
                if Self::validate_timeout(timeout).is_ok() {
                    self.timeout = Some(timeout);
                }
            }
        }

        if let Ok(ip) = std::env::var(ENV_FAILOVER_IP) {
            if !ip.trim().is_empty() {
                self.failover_ip = Some(ip);
            }
        }

        if let Ok(ip) = std::env::var(ENV_LOCAL_IP) {
            if !ip.trim().is_empty() {
                self.local_ip = Some(ip);
            }
        }

        self
    }

    /// Build the final configuration with validation
    ///
    /// # Errors
    ///
    /// Fails when no credential file was loaded.
    pub fn build(self) -> Result<CliConfig> {
        let file = self.credentials.ok_or_else(|| {
            FailoverError::Credentials("no credential file loaded".to_string())
        })?;

        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let output_format = self.output_format.unwrap_or_else(|| "plain".to_string());
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        // Validate final values
        Self::validate_url(&base_url)?;
        Self::validate_output_format(&output_format)?;
        Self::validate_timeout(timeout)?;

        Ok(CliConfig {
            base_url,
            timeout,
            output_format,
            verbose: self.verbose.unwrap_or(false),
            credentials: file.credentials,
            failover_ip: self.failover_ip,
            local_ip: self.local_ip,
            credentials_path: file.path,
        })
    }

    /// Validate URL format
    fn validate_url(url: &str) -> Result<(), FailoverError> {
        if url.is_empty() {
            return Err(FailoverError::Config("API URL cannot be empty".to_string()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(FailoverError::Config(format!(
                "API URL must start with http:// or https://, got '{}'",
                url
            )));
        }

        Ok(())
    }

    /// Validate output format
    fn validate_output_format(format: &str) -> Result<(), FailoverError> {
        match format {
            "plain" | "table" | "json" => Ok(()),
            _ => Err(FailoverError::Config(format!(
                "Invalid output format '{}'. Must be 'plain', 'table' or 'json'",
                format
            ))),
        }
    }

    /// Validate timeout value
    fn validate_timeout(timeout: u64) -> Result<(), FailoverError> {
        if timeout == 0 {
            return Err(FailoverError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if timeout > 300 {
            return Err(FailoverError::Config(
                "Timeout must be less than or equal to 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}
