//! Command implementations.

pub mod config;
pub mod decode;
pub mod metadata;
pub mod respond;

pub use config::run_config;
pub use decode::run_decode;
pub use metadata::run_metadata;
pub use respond::run_respond;

use std::path::Path;

use sso_model::KeyMaterial;

use crate::CliResult;

/// Reads a text file named on the command line.
pub(crate) fn read_file(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        crate::CliError::InvalidArgument(format!("cannot read {}: {e}", path.display()))
    })
}

/// Reads certificate and key PEM files.
pub(crate) fn read_key_material(cert: &Path, key: &Path) -> CliResult<KeyMaterial> {
    Ok(KeyMaterial::new(read_file(cert)?, read_file(key)?))
}
