//! Failover CLI
//!
//! Command-line interface for Hetzner failover IPs.

use clap::Parser;
use failover_core::default_credential_paths;
use failoverctl::app::run;
use failoverctl::cli::{generate_completion, Cli};
use failoverctl::client::FailoverClient;
use failoverctl::config::ENV_VERBOSE;
use std::io;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(shell) = cli.completion {
        generate_completion(shell, &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let verbose = cli.verbose
        || std::env::var(ENV_VERBOSE).is_ok_and(|v| v.eq_ignore_ascii_case("true") || v == "1");
    init_tracing(verbose);

    let code = run(
        &cli,
        &default_credential_paths(),
        |config| {
            let client = FailoverClient::new(
                &config.base_url,
                config.timeout,
                config.credentials.clone(),
            )?;
            Ok(client)
        },
        &mut io::stdout(),
    )
    .await;

    ExitCode::from(code)
}

/// Log to stderr so stdout stays clean for scripts.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
