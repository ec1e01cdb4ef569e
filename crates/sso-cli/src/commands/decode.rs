//! `decode` command.

use sso_protocol_saml::decode_request;

use crate::cli::DecodeArgs;
use crate::config::OutputFormat;
use crate::output::output_single;

/// Decodes a `SAMLRequest` and prints its fields.
pub fn run_decode(args: &DecodeArgs, format: OutputFormat) -> crate::CliResult<()> {
    let request = decode_request(&args.request)?;
    output_single(&request, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sso_protocol_saml::bindings::encode_request;

    #[test]
    fn decodes_encoded_request() {
        let encoded = encode_request(
            r#"<samlp:AuthnRequest xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" ID="req-9"><saml:Issuer xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion">https://sp.example</saml:Issuer></samlp:AuthnRequest>"#,
        )
        .unwrap();
        let args = DecodeArgs { request: encoded };
        assert!(run_decode(&args, OutputFormat::Quiet).is_ok());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let args = DecodeArgs {
            request: "%%%".to_string(),
        };
        assert!(matches!(
            run_decode(&args, OutputFormat::Quiet),
            Err(crate::CliError::Saml(sso_protocol_saml::SamlError::Decode(_)))
        ));
    }
}
