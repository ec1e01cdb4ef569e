//! `respond` command.

use serde::Serialize;
use sso_model::{KeyMaterial, Principal, RelyingApplication};
use sso_protocol_saml::{EncodedResponse, HttpMethod, ProtocolVersion, SamlIdp, SsoContext};
use tracing::info;

use crate::cli::RespondArgs;
use crate::config::OutputFormat;
use crate::output::{output_single, warning};
use crate::{CliConfig, CliError, CliResult};

use super::{read_file, read_key_material};

/// Summary printed for an encoded response.
#[derive(Debug, Serialize)]
pub struct ResponseView {
    /// Consumer URL.
    pub destination: String,
    /// Delivery method.
    pub method: HttpMethod,
    /// Whether the payload is deflated.
    pub compressed: bool,
    /// Redirect URL for GET delivery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    /// Base64 payload.
    pub payload: String,
}

impl ResponseView {
    fn new(response: EncodedResponse, relay_state: Option<&str>) -> Self {
        let redirect_url =
            (response.method == HttpMethod::Get).then(|| response.redirect_url(relay_state));
        Self {
            destination: response.destination,
            method: response.method,
            compressed: response.compressed,
            redirect_url,
            payload: response.payload,
        }
    }
}

/// Answers a request and prints the result.
pub fn run_respond(args: RespondArgs, config: &CliConfig, format: OutputFormat) -> CliResult<()> {
    let application = parse_application(&read_file(&args.application)?, &args.application.display().to_string())?;
    let principal = parse_principal(&read_file(&args.principal)?, &args.principal.display().to_string())?;
    let key = read_key_material(&args.cert, &args.key)?;

    if config.idp.digest_algorithm.is_legacy() {
        warning("signing with SHA-1; relying parties should move to SHA-256");
    }

    let version = if args.legacy {
        ProtocolVersion::Saml11
    } else {
        ProtocolVersion::Saml20
    };
    let response = respond(config, &args.request, &application, &principal, &key, &args.host, version)?;
    info!(destination = %response.destination, method = %response.method, "response ready");

    if args.form {
        println!("{}", response.post_form(args.relay_state.as_deref()));
        return Ok(());
    }
    output_single(&ResponseView::new(response, args.relay_state.as_deref()), format)
}

/// Runs the provider pipeline for one request.
pub fn respond(
    config: &CliConfig,
    saml_request: &str,
    application: &RelyingApplication,
    principal: &Principal,
    key: &KeyMaterial,
    host: &str,
    version: ProtocolVersion,
) -> CliResult<EncodedResponse> {
    let idp = SamlIdp::new(config.idp.clone());
    let ctx = SsoContext {
        application,
        principal,
        key,
        host,
    };
    Ok(idp.respond(saml_request, &ctx, version)?)
}

/// Parses a relying application from TOML.
pub fn parse_application(content: &str, path: &str) -> CliResult<RelyingApplication> {
    toml::from_str(content).map_err(|e| CliError::Input {
        kind: "application",
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Parses a principal from JSON.
pub fn parse_principal(content: &str, path: &str) -> CliResult<Principal> {
    serde_json::from_str(content).map_err(|e| CliError::Input {
        kind: "principal",
        path: path.to_string(),
        message: e.to_string(),
    })
}
