//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

/// SSO identity provider - SAML metadata and responses from the command line.
#[derive(Debug, Parser)]
#[command(name = "sso-idp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ~/.sso-idp/idp.toml).
    #[arg(short, long, env = "SSO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (overrides config).
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print IdP metadata for an application.
    Metadata(MetadataArgs),

    /// Answer an encoded AuthnRequest with a signed response.
    Respond(RespondArgs),

    /// Decode an AuthnRequest without answering it.
    Decode(DecodeArgs),

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for `metadata`.
#[derive(Debug, Args)]
pub struct MetadataArgs {
    /// Application owner.
    #[arg(long)]
    pub owner: String,

    /// Application name.
    #[arg(long)]
    pub name: String,

    /// IdP certificate, PEM.
    #[arg(long)]
    pub cert: PathBuf,

    /// Host the metadata is served from.
    #[arg(long, default_value = "localhost:8000")]
    pub host: String,
}

/// Arguments for `respond`.
#[derive(Debug, Args)]
pub struct RespondArgs {
    /// Base64 `SAMLRequest` as received on the redirect binding.
    #[arg(long)]
    pub request: String,

    /// Relying application, TOML.
    #[arg(long)]
    pub application: PathBuf,

    /// Authenticated principal, JSON.
    #[arg(long)]
    pub principal: PathBuf,

    /// Signing certificate, PEM.
    #[arg(long)]
    pub cert: PathBuf,

    /// Signing key, PEM (PKCS#1 or PKCS#8).
    #[arg(long)]
    pub key: PathBuf,

    /// Host the request arrived on.
    #[arg(long, default_value = "localhost:8000")]
    pub host: String,

    /// Produce a SAML 1.1 response.
    #[arg(long)]
    pub legacy: bool,

    /// RelayState to carry with the response.
    #[arg(long)]
    pub relay_state: Option<String>,

    /// Print the auto-submitting HTML form instead of a summary.
    #[arg(long)]
    pub form: bool,
}

/// Arguments for `decode`.
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Base64 `SAMLRequest`.
    #[arg(long)]
    pub request: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,

    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}
