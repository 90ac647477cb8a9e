//! Failover CLI Library
//!
//! This library provides the core functionality for the `failoverctl` tool.
//!
//! # Public API
//!
//! The primary public API is [`client::FailoverClient`], an implementation
//! of [`client::FailoverApi`] for the Robot web service. Configuration types
//! are available via [`config::CliConfig`] and [`config::ConfigBuilder`].
//!
//! ```no_run
//! use failoverctl::client::{FailoverApi, FailoverClient};
//! use failover_core::Credentials;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = FailoverClient::new(
//!     "https://robot-ws.your-server.de",
//!     30,  // timeout in seconds
//!     Credentials::new("#ws+user", "secret"),
//! )?;
//!
//! let record = client.get_failover("198.51.100.5").await?;
//! println!("Active server: {}", record.active_server_address);
//! # Ok(())
//! # }
//! ```

/// Top-level runner turning an invocation into an exit code.
pub mod app;

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for the Robot failover endpoints.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

/// Process exit codes.
pub mod exit_code;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

// Mock server and spy client, shared by unit and integration tests
#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;
