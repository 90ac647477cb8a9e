//! Output formatting utilities for the CLI
//!
//! Plain output is tab-separated and meant for scripts; table output adds
//! colours; JSON output mirrors the wire names plus the derived fields.

use anyhow::Result;
use colored::*;
use failover_core::{DutyMark, FailoverRecord};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Table,
    Json,
}

impl OutputFormat {
    /// Map a validated configuration value; unknown values fall back to plain.
    pub fn from_config(value: &str) -> Self {
        match value {
            "table" => OutputFormat::Table,
            "json" => OutputFormat::Json,
            _ => OutputFormat::Plain,
        }
    }
}

/// Header of the plain list view
pub const PLAIN_HEADER: &str = "ip\tnetmask\tactive_server_ip\tserver_ip\tserver_number";

/// A record with its optional duty column
#[derive(Debug, Clone, PartialEq)]
pub struct MarkedRecord {
    pub record: FailoverRecord,
    /// `None` when no duty column is shown at all
    pub mark: Option<DutyMark>,
}

impl MarkedRecord {
    pub fn new(record: FailoverRecord, mark: Option<DutyMark>) -> Self {
        Self { record, mark }
    }
}

#[derive(Serialize)]
struct RecordView<'a> {
    ip: &'a str,
    netmask: &'a str,
    prefix_length: u8,
    active_server_ip: &'a str,
    server_ip: &'a str,
    server_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    duty: Option<DutyMark>,
}

impl<'a> RecordView<'a> {
    fn new(row: &'a MarkedRecord) -> Result<Self> {
        Ok(Self {
            ip: &row.record.address,
            netmask: &row.record.netmask,
            prefix_length: row.record.prefix_length()?,
            active_server_ip: &row.record.active_server_address,
            server_ip: &row.record.server_address,
            server_number: row.record.server_number,
            duty: row.mark,
        })
    }
}

/// Format one record as a tab-separated line.
///
/// # Errors
///
/// Fails if the record's netmask is malformed.
pub fn format_plain_line(row: &MarkedRecord) -> Result<String> {
    let record = &row.record;
    let mut line = format!(
        "{}\t/{}\t{}\t{}\t{}",
        record.address,
        record.prefix_length()?,
        record.active_server_address,
        record.server_address,
        record.server_number
    );
    if let Some(mark) = row.mark {
        line.push('\t');
        line.push_str(mark.symbol());
    }
    Ok(line)
}

fn colored_mark(mark: DutyMark) -> String {
    match mark {
        DutyMark::OnDuty => mark.symbol().green().bold().to_string(),
        DutyMark::Standby => mark.symbol().yellow().to_string(),
        DutyMark::NotApplicable => String::new(),
    }
}

fn format_table(rows: &[MarkedRecord]) -> Result<String> {
    #[derive(Tabled)]
    struct FailoverRow {
        #[tabled(rename = "Failover IP")]
        ip: String,
        #[tabled(rename = "Active Server")]
        active: String,
        #[tabled(rename = "Server")]
        server: String,
        #[tabled(rename = "Server #")]
        number: String,
        #[tabled(rename = "Duty")]
        duty: String,
    }

    let mut table_rows = Vec::with_capacity(rows.len());
    for row in rows {
        let record = &row.record;
        table_rows.push(FailoverRow {
            ip: format!("{}/{}", record.address, record.prefix_length()?)
                .cyan()
                .to_string(),
            active: record.active_server_address.clone(),
            server: record.server_address.clone(),
            number: record.server_number.to_string(),
            duty: row.mark.map(colored_mark).unwrap_or_default(),
        });
    }

    Ok(Table::new(table_rows).with(Style::rounded()).to_string())
}

/// Format the list view.
///
/// The plain format starts with a header line; the duty column is present
/// when any row carries a mark.
pub fn format_records(rows: &[MarkedRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let views = rows
                .iter()
                .map(RecordView::new)
                .collect::<Result<Vec<_>>>()?;
            Ok(serde_json::to_string_pretty(&views)?)
        }
        OutputFormat::Table => {
            let table = format_table(rows)?;
            Ok(format!("{}\n{}", "Failover IPs:".bold(), table))
        }
        OutputFormat::Plain => {
            let mut header = PLAIN_HEADER.to_string();
            if rows.iter().any(|r| r.mark.is_some()) {
                header.push_str("\tduty");
            }

            let mut lines = vec![header];
            for row in rows {
                lines.push(format_plain_line(row)?);
            }
            Ok(lines.join("\n"))
        }
    }
}

/// Format a single record, without a header.
pub fn format_record(row: &MarkedRecord, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&RecordView::new(row)?)?),
        OutputFormat::Table => format_table(std::slice::from_ref(row)),
        OutputFormat::Plain => format_plain_line(row),
    }
}
