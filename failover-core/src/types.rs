//! Core types and data structures for failover IPs

use serde::{Deserialize, Serialize};

/// Default base URL of the Hetzner Robot web service
pub const DEFAULT_API_URL: &str = "https://robot-ws.your-server.de";

/// A failover IP as reported by the Robot API.
///
/// The serde names are the wire contract; every field is required and
/// unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailoverRecord {
    /// The failover address itself
    #[serde(rename = "ip")]
    pub address: String,
    /// Subnet mask of the failover net, display only
    pub netmask: String,
    /// Server currently receiving traffic for `address`
    #[serde(rename = "active_server_ip")]
    pub active_server_address: String,
    /// Server that owns the failover record
    #[serde(rename = "server_ip")]
    pub server_address: String,
    /// Provider-assigned server number of the owner
    pub server_number: u64,
}

impl FailoverRecord {
    /// Create a new record
    pub fn new(
        address: impl Into<String>,
        netmask: impl Into<String>,
        active_server_address: impl Into<String>,
        server_address: impl Into<String>,
        server_number: u64,
    ) -> Self {
        Self {
            address: address.into(),
            netmask: netmask.into(),
            active_server_address: active_server_address.into(),
            server_address: server_address.into(),
            server_number,
        }
    }

    /// Prefix length of the record's netmask.
    pub fn prefix_length(&self) -> crate::Result<u8> {
        crate::netmask::prefix_length(&self.netmask)
    }
}
