//! CLI flag definitions and action resolution

use crate::config::CliConfig;
use clap::Parser;
use failover_core::{FailoverError, Result};
use std::path::PathBuf;

/// Hetzner failover IP control
///
/// Without action flags every failover IP of the account is listed.
#[derive(Parser, Debug, Default)]
#[command(name = "failoverctl")]
#[command(version, about = "List, check and switch Hetzner failover IPs", long_about = None)]
pub struct Cli {
    /// Failover IP to show or update (default from the credential file)
    #[arg(short = 'f', long = "failover-ip")]
    pub failover_ip: Option<String>,

    /// New active server IP for the failover IP
    #[arg(short = 's', long = "active-server-ip")]
    pub active_server_ip: Option<String>,

    /// IP of this machine, used to mark duty (default from the credential file)
    #[arg(short = 'l', long = "local-ip")]
    pub local_ip: Option<String>,

    /// List all failover IPs
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Exit 0 if this machine is the active server, 3 if it is standby
    #[arg(short = 't', long)]
    pub check: bool,

    /// Route the failover IP to this machine
    #[arg(long)]
    pub take: bool,

    /// API base URL (overrides credential file and environment)
    #[arg(long)]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format (overrides environment)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Credential file (default: ~/.hetzner.rc, then /etc/hetzner-api.conf)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completion: Option<clap_complete::Shell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated output for scripts
    Plain,
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl OutputFormat {
    /// Name as accepted by the configuration layer
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

impl From<&OutputFormat> for crate::format::OutputFormat {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Plain => crate::format::OutputFormat::Plain,
            OutputFormat::Table => crate::format::OutputFormat::Table,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

/// The single thing one invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// List every failover IP
    ListAll,
    /// Show one failover IP
    Show { failover: String },
    /// Route a failover IP to another server
    Update { failover: String, server: String },
    /// Report duty through the exit code only
    CheckStatus { failover: String, local: String },
}

impl Action {
    /// Pick the action from the flags.
    ///
    /// Explicit flags take precedence; the failover and local addresses fall
    /// back to the configuration defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FailoverError::Usage`] for contradictory flags or when a
    /// required address is missing.
    pub fn resolve(cli: &Cli, config: &CliConfig) -> Result<Action> {
        let usage = |msg: &str| Err(FailoverError::Usage(msg.to_string()));

        if cli.check && cli.take {
            return usage("--check and --take are mutually exclusive");
        }
        if cli.all && (cli.check || cli.take || cli.active_server_ip.is_some()) {
            return usage("--all cannot be combined with --check, --take or --active-server-ip");
        }
        if cli.take && cli.active_server_ip.is_some() {
            return usage("--take already selects this machine; drop --active-server-ip");
        }

        let failover = cli
            .failover_ip
            .clone()
            .or_else(|| config.failover_ip.clone());
        let local = cli.local_ip.clone().or_else(|| config.local_ip.clone());

        if cli.check || cli.take {
            let flag = if cli.check { "--check" } else { "--take" };
            let Some(failover) = failover else {
                return Err(FailoverError::Usage(format!(
                    "{} needs a failover IP (-f or failover_ip)",
                    flag
                )));
            };
            let Some(local) = local else {
                return Err(FailoverError::Usage(format!(
                    "{} needs a local IP (-l or local_ip)",
                    flag
                )));
            };

            return Ok(if cli.check {
                Action::CheckStatus { failover, local }
            } else {
                Action::Update {
                    failover,
                    server: local,
                }
            });
        }

        if let Some(server) = &cli.active_server_ip {
            let Some(failover) = failover else {
                return usage("--active-server-ip needs a failover IP (-f or failover_ip)");
            };
            return Ok(Action::Update {
                failover,
                server: server.clone(),
            });
        }

        if !cli.all {
            if let Some(failover) = &cli.failover_ip {
                return Ok(Action::Show {
                    failover: failover.clone(),
                });
            }
        }

        Ok(Action::ListAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use failover_core::Credentials;

    fn config(failover: Option<&str>, local: Option<&str>) -> CliConfig {
        CliConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: 5,
            output_format: "plain".to_string(),
            verbose: false,
            credentials: Credentials::new("a", "b"),
            failover_ip: failover.map(str::to_string),
            local_ip: local.map(str::to_string),
            credentials_path: PathBuf::from("/tmp/rc"),
        }
    }

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["failoverctl"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn usage_err(result: Result<Action>) -> bool {
        matches!(result, Err(FailoverError::Usage(_)))
    }

    #[test]
    fn test_no_flags_lists_all() {
        let cfg = config(Some("198.51.100.5"), Some("203.0.113.1"));
        assert_eq!(Action::resolve(&parse(&[]), &cfg).unwrap(), Action::ListAll);
        assert_eq!(Action::resolve(&parse(&["-a"]), &cfg).unwrap(), Action::ListAll);
    }

    #[test]
    fn test_failover_flag_shows_one() {
        let cfg = config(None, None);
        assert_eq!(
            Action::resolve(&parse(&["-f", "198.51.100.5"]), &cfg).unwrap(),
            Action::Show {
                failover: "198.51.100.5".to_string()
            }
        );
    }

    #[test]
    fn test_all_with_failover_still_lists() {
        let cfg = config(None, None);
        assert_eq!(
            Action::resolve(&parse(&["-a", "-f", "198.51.100.5"]), &cfg).unwrap(),
            Action::ListAll
        );
    }

    #[test]
    fn test_update_with_explicit_and_default_failover() {
        let cfg = config(Some("198.51.100.6"), None);
        assert_eq!(
            Action::resolve(
                &parse(&["--failover-ip", "198.51.100.5", "--active-server-ip", "203.0.113.2"]),
                &cfg
            )
            .unwrap(),
            Action::Update {
                failover: "198.51.100.5".to_string(),
                server: "203.0.113.2".to_string()
            }
        );
        assert_eq!(
            Action::resolve(&parse(&["-s", "203.0.113.2"]), &cfg).unwrap(),
            Action::Update {
                failover: "198.51.100.6".to_string(),
                server: "203.0.113.2".to_string()
            }
        );
    }

    #[test]
    fn test_update_without_failover_is_usage_error() {
        let cfg = config(None, None);
        assert!(usage_err(Action::resolve(&parse(&["-s", "203.0.113.2"]), &cfg)));
    }

    #[test]
    fn test_take_uses_local_address() {
        let cfg = config(Some("198.51.100.5"), Some("203.0.113.1"));
        assert_eq!(
            Action::resolve(&parse(&["--take"]), &cfg).unwrap(),
            Action::Update {
                failover: "198.51.100.5".to_string(),
                server: "203.0.113.1".to_string()
            }
        );
    }

    #[test]
    fn test_take_needs_both_addresses() {
        assert!(usage_err(Action::resolve(
            &parse(&["--take"]),
            &config(Some("198.51.100.5"), None)
        )));
        assert!(usage_err(Action::resolve(
            &parse(&["--take", "-l", "203.0.113.1"]),
            &config(None, None)
        )));
    }

    #[test]
    fn test_check_resolution() {
        let cfg = config(None, None);
        assert_eq!(
            Action::resolve(&parse(&["-t", "-f", "198.51.100.5", "-l", "203.0.113.1"]), &cfg)
                .unwrap(),
            Action::CheckStatus {
                failover: "198.51.100.5".to_string(),
                local: "203.0.113.1".to_string()
            }
        );
        assert!(usage_err(Action::resolve(&parse(&["--check"]), &cfg)));
    }

    #[test]
    fn test_conflicting_flags() {
        let cfg = config(Some("198.51.100.5"), Some("203.0.113.1"));
        assert!(usage_err(Action::resolve(&parse(&["--check", "--take"]), &cfg)));
        assert!(usage_err(Action::resolve(&parse(&["-a", "--check"]), &cfg)));
        assert!(usage_err(Action::resolve(&parse(&["-a", "-s", "203.0.113.2"]), &cfg)));
        assert!(usage_err(Action::resolve(
            &parse(&["--take", "-s", "203.0.113.2"]),
            &cfg
        )));
    }

    #[test]
    fn test_flags_parse() {
        let cli = parse(&[
            "--url",
            "http://127.0.0.1:8080",
            "--timeout",
            "5",
            "--format",
            "json",
            "-c",
            "/tmp/rc",
            "-v",
        ]);
        assert_eq!(cli.url.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(cli.timeout, Some(5));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/rc")));
        assert!(cli.verbose);
    }
}
