//! Failover Core Library
//!
//! Shared types and logic for managing Hetzner failover IPs: the record
//! model and its wire envelope, netmask formatting, duty evaluation and
//! credential loading. The CLI crate builds on top of this one.

pub mod api;
pub mod config;
pub mod duty;
pub mod error;
pub mod netmask;
pub mod types;

// Re-export commonly used types
pub use config::{default_credential_paths, unquote, CredentialFile, Credentials};
pub use duty::{evaluate, mark_for, DutyMark, DutyStatus};
pub use error::*;
pub use netmask::prefix_length;
pub use types::*;
