//! Netmask to prefix length conversion

use crate::error::{FailoverError, Result};
use std::net::IpAddr;

/// Convert a subnet mask to its prefix length.
///
/// Accepts a dotted-quad IPv4 mask (0-32) or an IPv6 mask (0-128). The mask
/// must be a contiguous run of one-bits followed by zero-bits.
///
/// # Errors
///
/// Returns [`FailoverError::InvalidNetmask`] for anything that is not an
/// address or not a contiguous mask.
pub fn prefix_length(mask: &str) -> Result<u8> {
    let invalid = || FailoverError::InvalidNetmask(mask.to_string());
    let addr: IpAddr = mask.trim().parse().map_err(|_| invalid())?;

    match addr {
        IpAddr::V4(v4) => ipnet::ipv4_mask_to_prefix(v4),
        IpAddr::V6(v6) => ipnet::ipv6_mask_to_prefix(v6),
    }
    .map_err(|_| invalid())
}
