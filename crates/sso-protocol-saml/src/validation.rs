//! Issuer allow-listing.
//!
//! The only trust gate before an assertion is produced: the request issuer
//! must exactly equal one of the application's redirect URIs.

use sso_model::RelyingApplication;

use crate::error::{SamlError, SamlResult};
use crate::types::AuthnRequest;

/// Checks the request issuer against the application's redirect URIs.
///
/// # Errors
///
/// Returns [`SamlError::UnauthorizedIssuer`] when no redirect URI matches.
pub fn validate_issuer(request: &AuthnRequest, application: &RelyingApplication) -> SamlResult<()> {
    if application.allows_issuer(&request.issuer) {
        Ok(())
    } else {
        Err(SamlError::UnauthorizedIssuer {
            issuer: request.issuer.clone(),
        })
    }
}

/// Audience URIs for a response: the request issuer, then each redirect URI
/// not already listed.
#[must_use]
pub fn audiences(request: &AuthnRequest, application: &RelyingApplication) -> Vec<String> {
    let mut out = vec![request.issuer.clone()];
    for uri in &application.redirect_uris {
        if !out.contains(uri) {
            out.push(uri.clone());
        }
    }
    out
}
