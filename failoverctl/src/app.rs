//! Top-level runner: configuration, action dispatch and exit codes.
//!
//! Nothing below this module terminates the process; every failure comes
//! back here and is turned into an exit code.

use anyhow::Result;
use clap::CommandFactory;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::{handle_check, handle_list, handle_show, handle_update, Action, Cli};
use crate::client::FailoverApi;
use crate::config::CliConfig;
use crate::exit_code;
use crate::format::OutputFormat;

/// Build configuration using the priority chain:
/// defaults → credential file → env → CLI args
///
/// `--config` replaces `search_paths` with the given file.
pub fn build_config(cli: &Cli, search_paths: &[PathBuf]) -> Result<CliConfig> {
    let paths = match &cli.config {
        Some(path) => vec![path.clone()],
        None => search_paths.to_vec(),
    };

    let mut builder = CliConfig::builder()
        .with_credential_file(&paths)?
        .with_env_overrides();

    if let Some(url) = &cli.url {
        builder = builder.with_base_url(url)?;
    }
    if let Some(timeout) = cli.timeout {
        builder = builder.with_timeout(timeout)?;
    }
    if let Some(format) = &cli.format {
        builder = builder.with_output_format(format.as_str())?;
    }
    if cli.verbose {
        builder = builder.with_verbose(true);
    }
    if let Some(ip) = &cli.failover_ip {
        builder = builder.with_failover_ip(ip);
    }
    if let Some(ip) = &cli.local_ip {
        builder = builder.with_local_ip(ip);
    }

    builder.build()
}

/// Run one invocation and return its exit code.
///
/// `connect` is only called once the configuration and the action are
/// known, so configuration and usage errors never reach the network.
pub async fn run<A, F, W>(cli: &Cli, search_paths: &[PathBuf], connect: F, out: &mut W) -> u8
where
    A: FailoverApi,
    F: FnOnce(&CliConfig) -> Result<A>,
    W: Write,
{
    let config = match build_config(cli, search_paths) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return exit_code::FAILURE;
        }
    };
    debug!(
        "API {} (timeout {}s), credentials from {}",
        config.base_url,
        config.timeout,
        config.credentials_path.display()
    );

    let action = match Action::resolve(cli, &config) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("{}\n", e);
            eprintln!("{}", Cli::command().render_help());
            return exit_code::USAGE;
        }
    };
    debug!("Action: {:?}", action);

    let api = match connect(&config) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return exit_code::FAILURE;
        }
    };

    execute(&action, &api, &config, out).await
}

/// Execute a resolved action against `api`.
pub async fn execute<A, W>(action: &Action, api: &A, config: &CliConfig, out: &mut W) -> u8
where
    A: FailoverApi + ?Sized,
    W: Write,
{
    let format = OutputFormat::from_config(&config.output_format);
    let local = config.local_ip.as_deref();

    let result = match action {
        Action::ListAll => {
            handle_list(api, config.failover_ip.as_deref(), local, format, out).await
        }
        Action::Show { failover } => handle_show(api, failover, local, format, out).await,
        Action::Update { failover, server } => {
            handle_update(api, failover, server, local, format, out).await
        }
        Action::CheckStatus { failover, local } => {
            return match handle_check(api, failover, local).await {
                Ok(status) => exit_code::for_duty(status),
                Err(e) => {
                    report(&e, config.verbose);
                    exit_code::for_check_failure(&e)
                }
            };
        }
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            report(&e, config.verbose);
            exit_code::FAILURE
        }
    }
}

fn report(error: &anyhow::Error, verbose: bool) {
    eprintln!("Error: {:#}", error);
    if verbose {
        eprintln!("Error details: {:?}", error);
    }
}
