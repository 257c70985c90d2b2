mod cli;
mod config;

use std::process::ExitCode;

use clap::Parser;
use sunhex_core::SinCodec;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::CliConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("sunhex: {err}");
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
    debug!(
        kdf_iterations = config.codec.kdf_iterations,
        default_protocol = %config.codec.default_protocol,
        "config loaded"
    );

    let codec = match SinCodec::new(&config.codec) {
        Ok(codec) => codec,
        Err(err) => {
            error!(%err, "invalid codec config");
            return ExitCode::from(2);
        }
    };
    let output = cli.command.run(&codec);

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            error!(%err, "failed to serialize output");
            return ExitCode::FAILURE;
        }
    }

    if output.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
