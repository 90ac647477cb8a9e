//! Command execution handlers

use anyhow::{Context, Result};
use failover_core::{duty, DutyMark, DutyStatus, FailoverRecord};
use std::io::Write;
use tracing::info;

use crate::client::FailoverApi;
use crate::format::{format_record, format_records, MarkedRecord, OutputFormat};

use super::commands::Cli;

/// Duty mark of `record` relative to `local`, if the local address is known
fn mark_against(record: &FailoverRecord, local: Option<&str>) -> Option<DutyMark> {
    local.map(|local| DutyMark::from(duty::evaluate(&record.active_server_address, local)))
}

/// Handle the list view
///
/// Rows get a duty column when `local` is known; only the `tracked` record
/// is evaluated when one is given.
pub async fn handle_list<A, W>(
    api: &A,
    tracked: Option<&str>,
    local: Option<&str>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    A: FailoverApi + ?Sized,
    W: Write,
{
    let records = api
        .list_failovers()
        .await
        .context("Failed to list failover IPs")?;

    let rows: Vec<MarkedRecord> = records
        .into_iter()
        .map(|record| {
            let mark = local.map(|_| duty::mark_for(&record, tracked, local));
            MarkedRecord::new(record, mark)
        })
        .collect();

    writeln!(out, "{}", format_records(&rows, format)?)?;
    Ok(())
}

/// Handle showing one failover IP
pub async fn handle_show<A, W>(
    api: &A,
    failover: &str,
    local: Option<&str>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    A: FailoverApi + ?Sized,
    W: Write,
{
    let record = api
        .get_failover(failover)
        .await
        .with_context(|| format!("Failed to fetch failover IP {}", failover))?;

    let mark = mark_against(&record, local);
    writeln!(out, "{}", format_record(&MarkedRecord::new(record, mark), format)?)?;
    Ok(())
}

/// Handle routing a failover IP to `server`, printing the updated record
pub async fn handle_update<A, W>(
    api: &A,
    failover: &str,
    server: &str,
    local: Option<&str>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    A: FailoverApi + ?Sized,
    W: Write,
{
    let record = api
        .update_failover(failover, server)
        .await
        .with_context(|| format!("Failed to route {} to {}", failover, server))?;
    info!(
        "{} now routed to {}",
        record.address, record.active_server_address
    );

    let mark = mark_against(&record, local);
    writeln!(out, "{}", format_record(&MarkedRecord::new(record, mark), format)?)?;
    Ok(())
}

/// Handle the duty check; nothing is printed
pub async fn handle_check<A>(api: &A, failover: &str, local: &str) -> Result<DutyStatus>
where
    A: FailoverApi + ?Sized,
{
    let record = api
        .get_failover(failover)
        .await
        .with_context(|| format!("Failed to fetch failover IP {}", failover))?;

    let status = duty::evaluate(&record.active_server_address, local);
    info!(
        "{} is routed to {}: {:?}",
        record.address, record.active_server_address, status
    );
    Ok(status)
}

/// Generate shell completion script
pub fn generate_completion<W: Write>(shell: clap_complete::Shell, out: &mut W) {
    use clap::CommandFactory;
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SpyApi, SpyFailure};
    use failover_core::FailoverError;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_list_without_local_has_no_duty_column() {
        let spy = SpyApi::new();
        let mut buf = Vec::new();
        handle_list(&spy, None, None, OutputFormat::Plain, &mut buf)
            .await
            .unwrap();

        let text = output(buf);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], crate::format::PLAIN_HEADER);
        assert_eq!(lines[1], "198.51.100.5\t/24\t203.0.113.9\t203.0.113.1\t12345");
        assert_eq!(lines[2], "198.51.100.6\t/32\t203.0.113.1\t203.0.113.9\t67890");
        assert_eq!(spy.calls(), vec!["list".to_string()]);
    }

    #[tokio::test]
    async fn test_list_marks_only_tracked_record() {
        let spy = SpyApi::new();
        let mut buf = Vec::new();
        // 198.51.100.6 is active on the local machine, but not tracked
        handle_list(
            &spy,
            Some("198.51.100.5"),
            Some("203.0.113.1"),
            OutputFormat::Plain,
            &mut buf,
        )
        .await
        .unwrap();

        let text = output(buf);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with("\tduty"));
        assert!(lines[1].ends_with("\t12345\t-"));
        assert!(lines[2].ends_with("\t67890\t"));
    }

    #[tokio::test]
    async fn test_list_untracked_marks_every_record() {
        let spy = SpyApi::new();
        let mut buf = Vec::new();
        handle_list(&spy, None, Some("203.0.113.1"), OutputFormat::Plain, &mut buf)
            .await
            .unwrap();

        let text = output(buf);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].ends_with("\t-"));
        assert!(lines[2].ends_with("\t+"));
    }

    #[tokio::test]
    async fn test_show_prints_single_line() {
        let spy = SpyApi::new();
        let mut buf = Vec::new();
        handle_show(&spy, "198.51.100.5", None, OutputFormat::Plain, &mut buf)
            .await
            .unwrap();

        assert_eq!(
            output(buf),
            "198.51.100.5\t/24\t203.0.113.9\t203.0.113.1\t12345\n"
        );
    }

    #[tokio::test]
    async fn test_show_with_local_marks() {
        let spy = SpyApi::new();
        let mut buf = Vec::new();
        handle_show(
            &spy,
            "198.51.100.5",
            Some("203.0.113.9"),
            OutputFormat::Plain,
            &mut buf,
        )
        .await
        .unwrap();

        assert!(output(buf).ends_with("\t12345\t+\n"));
    }

    #[tokio::test]
    async fn test_update_prints_new_record() {
        let spy = SpyApi::new();
        let mut buf = Vec::new();
        handle_update(
            &spy,
            "198.51.100.5",
            "203.0.113.1",
            Some("203.0.113.1"),
            OutputFormat::Plain,
            &mut buf,
        )
        .await
        .unwrap();

        assert_eq!(
            output(buf),
            "198.51.100.5\t/24\t203.0.113.1\t203.0.113.1\t12345\t+\n"
        );
        assert_eq!(
            spy.calls(),
            vec!["update 198.51.100.5 203.0.113.1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_check_status() {
        let spy = SpyApi::new();
        assert_eq!(
            handle_check(&spy, "198.51.100.5", "203.0.113.9").await.unwrap(),
            DutyStatus::OnDuty
        );
        assert_eq!(
            handle_check(&spy, "198.51.100.5", "203.0.113.1").await.unwrap(),
            DutyStatus::Standby
        );
    }

    #[tokio::test]
    async fn test_errors_keep_their_cause() {
        let spy = SpyApi::new().failing(SpyFailure::Status(500));
        let err = handle_check(&spy, "198.51.100.5", "203.0.113.9")
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<FailoverError>()
                .and_then(FailoverError::http_status),
            Some(500)
        );
    }

    #[test]
    fn test_mark_against_local() {
        let record = crate::test_utils::sample_records().remove(0);
        assert_eq!(mark_against(&record, None), None);
        assert_eq!(
            mark_against(&record, Some("203.0.113.9")),
            Some(DutyMark::OnDuty)
        );
        assert_eq!(
            mark_against(&record, Some("203.0.113.1")),
            Some(DutyMark::Standby)
        );
    }

    #[test]
    fn test_generate_completion() {
        let mut buf = Vec::new();
        generate_completion(clap_complete::Shell::Bash, &mut buf);
        assert!(output(buf).contains("failoverctl"));
    }
}
