//! Public origins of the identity provider.
//!
//! The backend origin is the IdP entity ID and assertion issuer. The frontend
//! origin hosts the login UI and templates the single sign-on location.

use std::net::IpAddr;

use crate::config::IdpConfig;

const DEV_BACKEND_HOST: &str = "localhost:8000";
const DEV_FRONTEND_ORIGIN: &str = "http://localhost:7001";
const DEV_BACKEND_ORIGIN: &str = "http://localhost:8000";

/// Frontend and backend origins for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origins {
    /// Origin of the login UI.
    pub frontend: String,
    /// Origin of the API; used as entity ID.
    pub backend: String,
}

impl Origins {
    /// Derives origins from the `Host` the request arrived on.
    #[must_use]
    pub fn from_host(host: &str, config: &IdpConfig) -> Self {
        if let Some(origin) = config.origin.as_deref().filter(|o| !o.is_empty()) {
            return Self {
                frontend: origin.to_string(),
                backend: origin.to_string(),
            };
        }

        if config.dev_mode && host == DEV_BACKEND_HOST {
            return Self {
                frontend: DEV_FRONTEND_ORIGIN.to_string(),
                backend: DEV_BACKEND_ORIGIN.to_string(),
            };
        }

        let origin = format!("{}{host}", scheme_for(host));
        Self {
            frontend: origin.clone(),
            backend: origin,
        }
    }
}

fn scheme_for(host: &str) -> &'static str {
    let name = strip_port(host);
    if !name.contains('.') || name.parse::<IpAddr>().is_ok() {
        "http://"
    } else {
        "https://"
    }
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split_once(']').map_or(rest, |(addr, _)| addr);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) => {
            name
        }
        _ => host,
    }
}
