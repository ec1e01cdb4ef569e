//! # sso-cli
//!
//! Command-line front end for the SAML identity provider core:
//! - Print IdP metadata for an application
//! - Answer an encoded `AuthnRequest` with a signed response
//! - Decode an `AuthnRequest` for inspection
//! - Show or initialise the configuration file

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
