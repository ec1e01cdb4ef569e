//! Configuration management commands.

use std::path::Path;

use crate::cli::ConfigCommand;
use crate::output::{info, success};
use crate::{CliConfig, CliError, CliResult};

/// Runs a config command.
pub fn run_config(cmd: ConfigCommand, config: &CliConfig, path: Option<&Path>) -> CliResult<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => CliConfig::config_path()?,
    };

    match cmd {
        ConfigCommand::Show => show_config(config, &path),
        ConfigCommand::Init { force } => init_config(&path, force),
    }
}

/// Shows the effective configuration.
fn show_config(config: &CliConfig, path: &Path) -> CliResult<()> {
    info(&format!("Configuration file: {}", path.display()));
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Writes a default configuration file.
fn init_config(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    CliConfig::default().save(path)?;
    success(&format!("Configuration written to {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("sso-idp-init-{}", std::process::id()));
        let path = dir.join("idp.toml");

        init_config(&path, false).unwrap();
        assert!(matches!(init_config(&path, false), Err(CliError::Config(_))));
        assert!(init_config(&path, true).is_ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
