//! CLI configuration.
//!
//! Read from TOML, with `SSO_*` environment variables taking precedence over
//! the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sso_protocol_saml::IdpConfig;

use crate::{CliError, CliResult};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Default output format.
    pub output_format: OutputFormat,

    /// Identity provider settings.
    pub idp: IdpConfig,
}

impl CliConfig {
    /// Loads configuration from `path`, or from the default location when
    /// `path` is `None`, then applies environment overrides.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None => {
                let default = Self::config_path()?;
                if default.exists() {
                    Self::read(&default)?
                } else {
                    Self::default()
                }
            }
        };
        config.with_env()
    }

    /// Parses a TOML document.
    pub fn from_toml(content: &str) -> CliResult<Self> {
        toml::from_str(content).map_err(|e| CliError::Config(format!("failed to parse config: {e}")))
    }

    /// Applies `SSO_*` environment overrides.
    pub fn with_env(mut self) -> CliResult<Self> {
        self.idp = self.idp.with_overrides(|key| std::env::var(key).ok())?;
        Ok(self)
    }

    /// Saves configuration to `path`.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Gets the default configuration file path.
    pub fn config_path() -> CliResult<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| CliError::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".sso-idp").join("idp.toml"))
    }

    fn read(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
    /// Quiet (minimal output).
    Quiet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sso_protocol_saml::DigestAlgorithm;

    #[test]
    fn parses_partial_file() {
        let config = CliConfig::from_toml(
            r#"
output_format = "json"

[idp]
dev_mode = true
digest_algorithm = "sha512"
"#,
        )
        .unwrap();

        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(config.idp.dev_mode);
        assert_eq!(config.idp.digest_algorithm, DigestAlgorithm::Sha512);
        assert!(config.idp.include_certificate);
        assert_eq!(config.idp.roles_separator, ",");
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(CliConfig::from_toml("").unwrap(), CliConfig::default());
    }

    #[test]
    fn unknown_digest_is_rejected() {
        let result = CliConfig::from_toml("[idp]\ndigest_algorithm = \"md5\"\n");
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn save_then_load_explicit_path() {
        let dir = std::env::temp_dir().join(format!("sso-idp-config-{}", std::process::id()));
        let path = dir.join("idp.toml");
        let mut config = CliConfig::default();
        config.idp.roles_separator = ";".to_string();

        config.save(&path).unwrap();
        let loaded = CliConfig::read(&path).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(loaded.idp.roles_separator, ";");
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let result = CliConfig::load(Some(Path::new("/nonexistent/sso-idp/idp.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
