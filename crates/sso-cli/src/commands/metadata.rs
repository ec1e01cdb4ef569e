//! `metadata` command.

use sso_model::{KeyMaterial, RelyingApplication};
use sso_protocol_saml::SamlIdp;

use crate::cli::MetadataArgs;
use crate::CliConfig;

use super::read_file;

/// Prints metadata XML for the named application.
pub fn run_metadata(args: MetadataArgs, config: &CliConfig) -> crate::CliResult<()> {
    let certificate = read_file(&args.cert)?;
    let xml = render(&args.owner, &args.name, certificate, &args.host, config)?;
    println!("{xml}");
    Ok(())
}

/// Renders metadata for `owner/name` as served from `host`.
pub fn render(
    owner: &str,
    name: &str,
    certificate_pem: String,
    host: &str,
    config: &CliConfig,
) -> crate::CliResult<String> {
    let application = RelyingApplication::new(owner, name);
    // Metadata only reads the certificate.
    let key = KeyMaterial::new(certificate_pem, String::new());
    let idp = SamlIdp::new(config.idp.clone());
    Ok(idp.metadata(&application, &key, host)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CERT: &str = include_str!("../../../sso-protocol-saml/tests/fixtures/idp-cert.pem");

    #[test]
    fn renders_sso_location() {
        let xml = render("acme", "portal", CERT.to_string(), "sso.acme.test", &CliConfig::default()).unwrap();
        assert!(xml.contains(r#"Location="https://sso.acme.test/login/saml/authorize/acme/portal""#));
        assert!(xml.contains(r#"entityID="https://sso.acme.test""#));
    }

    #[test]
    fn bad_certificate_fails() {
        let result = render("acme", "portal", "nope".to_string(), "sso.acme.test", &CliConfig::default());
        assert!(matches!(result, Err(crate::CliError::Saml(_))));
    }
}
