//! Duty evaluation: is the local machine the active server?

use crate::types::FailoverRecord;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Result of comparing an active server against the local address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DutyStatus {
    /// The local machine receives the traffic
    OnDuty,
    /// Another server receives the traffic
    Standby,
}

/// Display mark for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyMark {
    OnDuty,
    Standby,
    /// The record is not the one being tracked, or no local address is known
    NotApplicable,
}

impl DutyMark {
    /// Symbol printed in the duty column
    pub fn symbol(self) -> &'static str {
        match self {
            DutyMark::OnDuty => "+",
            DutyMark::Standby => "-",
            DutyMark::NotApplicable => "",
        }
    }
}

impl From<DutyStatus> for DutyMark {
    fn from(status: DutyStatus) -> Self {
        match status {
            DutyStatus::OnDuty => DutyMark::OnDuty,
            DutyStatus::Standby => DutyMark::Standby,
        }
    }
}

/// Compare two addresses.
///
/// Parsed addresses are compared by value so `2001:db8::1` equals
/// `2001:DB8:0::1`; anything unparsable falls back to string equality.
pub fn same_address(a: &str, b: &str) -> bool {
    match (a.trim().parse::<IpAddr>(), b.trim().parse::<IpAddr>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Decide whether `reference` is the active server.
pub fn evaluate(active: &str, reference: &str) -> DutyStatus {
    if same_address(active, reference) {
        DutyStatus::OnDuty
    } else {
        DutyStatus::Standby
    }
}

/// Mark a record for display.
///
/// Without a reference address nothing can be said. When a tracked failover
/// address is given, only the matching record is evaluated.
pub fn mark_for(
    record: &FailoverRecord,
    tracked: Option<&str>,
    reference: Option<&str>,
) -> DutyMark {
    let Some(reference) = reference else {
        return DutyMark::NotApplicable;
    };

    if let Some(tracked) = tracked {
        if !same_address(&record.address, tracked) {
            return DutyMark::NotApplicable;
        }
    }

    evaluate(&record.active_server_address, reference).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(address: &str, active: &str) -> FailoverRecord {
        FailoverRecord::new(address, "255.255.255.255", active, "203.0.113.1", 1)
    }

    #[test]
    fn test_evaluate() {
        assert_eq!(evaluate("203.0.113.9", "203.0.113.9"), DutyStatus::OnDuty);
        assert_eq!(evaluate("203.0.113.9", "203.0.113.1"), DutyStatus::Standby);
    }

    #[test]
    fn test_evaluate_ipv6_spelling() {
        assert_eq!(evaluate("2001:db8::1", "2001:DB8:0:0::1"), DutyStatus::OnDuty);
    }

    #[test]
    fn test_evaluate_unparsable_falls_back_to_text() {
        assert_eq!(evaluate("host-a", "host-a"), DutyStatus::OnDuty);
        assert_eq!(evaluate("host-a", "host-b"), DutyStatus::Standby);
    }

    #[test]
    fn test_mark_symbols() {
        assert_eq!(DutyMark::OnDuty.symbol(), "+");
        assert_eq!(DutyMark::Standby.symbol(), "-");
        assert_eq!(DutyMark::NotApplicable.symbol(), "");
    }

    #[test]
    fn test_mark_without_reference() {
        let r = record("198.51.100.5", "203.0.113.9");
        assert_eq!(
            mark_for(&r, Some("198.51.100.5"), None),
            DutyMark::NotApplicable
        );
    }

    #[test]
    fn test_mark_tracked_record() {
        let r = record("198.51.100.5", "203.0.113.9");
        assert_eq!(
            mark_for(&r, Some("198.51.100.5"), Some("203.0.113.9")),
            DutyMark::OnDuty
        );
        assert_eq!(
            mark_for(&r, Some("198.51.100.5"), Some("203.0.113.1")),
            DutyMark::Standby
        );
    }

    #[test]
    fn test_mark_untracked_record_is_blank_regardless() {
        let r = record("198.51.100.6", "203.0.113.9");
        // active matches the reference, but this is not the tracked address
        assert_eq!(
            mark_for(&r, Some("198.51.100.5"), Some("203.0.113.9")),
            DutyMark::NotApplicable
        );
        assert_eq!(
            mark_for(&r, Some("198.51.100.5"), Some("203.0.113.1")),
            DutyMark::NotApplicable
        );
    }

    #[test]
    fn test_mark_without_tracked_evaluates_every_record() {
        let r = record("198.51.100.6", "203.0.113.9");
        assert_eq!(mark_for(&r, None, Some("203.0.113.9")), DutyMark::OnDuty);
    }
}
