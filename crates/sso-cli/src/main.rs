//! # sso-idp
//!
//! Command-line front end for the SAML identity provider.

#![forbid(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;
use sso_cli::{
    cli::{Cli, Command},
    commands::{run_config, run_decode, run_metadata, run_respond},
    config::CliConfig,
    output::error,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let format = cli.output.unwrap_or(config.output_format);
    tracing::debug!(?format, "configuration loaded");

    match cli.command {
        Command::Metadata(args) => run_metadata(args, &config)?,
        Command::Respond(args) => run_respond(args, &config, format)?,
        Command::Decode(args) => run_decode(&args, format)?,
        Command::Config(cmd) => run_config(cmd, &config, cli.config.as_deref())?,
    }
    Ok(())
}
