mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sdx_config::ConfigError;
use sdx_core::{Gateway, GatewayConfig, TlsVerification};

use crate::cli::{Cli, GlobalOpts, LogFormat};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.log_format);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, format: LogFormat) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = build_gateway_config(&cli.global)?;
    tracing::debug!(oxp = %config.oxp_name, backend = %config.backend.url, "gateway configured");

    let gateway = Gateway::connect(config)?;
    commands::dispatch(cli.command, &gateway, &cli.global).await
}

/// Build a `GatewayConfig` from the config file, environment and CLI overrides.
fn build_gateway_config(global: &GlobalOpts) -> Result<GatewayConfig, CliError> {
    if let Some(path) = global.config.as_deref().filter(|p| !p.is_file()) {
        return Err(ConfigError::Validation {
            field: "config".into(),
            reason: format!("{} does not exist", path.display()),
        }
        .into());
    }

    let cfg = sdx_config::load_config(global.config.as_deref())?;
    let mut config = sdx_config::to_gateway_config(&cfg)?;

    if global.insecure {
        config.backend.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        config.timeout = std::time::Duration::from_secs(secs.max(1));
    }
    Ok(config)
}
