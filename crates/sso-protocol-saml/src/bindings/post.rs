//! HTTP-POST binding.
//!
//! Renders the auto-submitting HTML form that carries a response to the
//! service provider.

use super::SamlMessageType;

/// Renders an HTML form that auto-submits `payload` to `destination`.
///
/// `payload` is the already encoded message. Every interpolated value is
/// HTML-escaped.
#[must_use]
pub fn post_form(
    destination: &str,
    message_type: SamlMessageType,
    payload: &str,
    relay_state: Option<&str>,
) -> String {
    let relay_state_input = relay_state
        .map(|rs| {
            format!(
                r#"<input type="hidden" name="RelayState" value="{}"/>"#,
                html_escape(rs)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>SAML POST Binding</title>
</head>
<body onload="document.forms[0].submit()">
    <noscript>
        <p>JavaScript is disabled. Click the button below to continue.</p>
    </noscript>
    <form method="post" action="{}">
        <input type="hidden" name="{}" value="{}"/>
        {}
        <noscript>
            <input type="submit" value="Continue"/>
        </noscript>
    </form>
</body>
</html>"#,
        html_escape(destination),
        message_type.form_param(),
        html_escape(payload),
        relay_state_input
    )
}

/// Escapes HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_carries_payload_and_relay_state() {
        let html = post_form(
            "https://sp.example/acs",
            SamlMessageType::Response,
            "UEFZTE9BRA==",
            Some("state123"),
        );

        assert!(html.contains(r#"action="https://sp.example/acs""#));
        assert!(html.contains(r#"name="SAMLResponse" value="UEFZTE9BRA==""#));
        assert!(html.contains(r#"name="RelayState" value="state123""#));
    }

    #[test]
    fn relay_state_is_optional() {
        let html = post_form("https://sp.example/acs", SamlMessageType::Response, "abc", None);
        assert!(!html.contains("RelayState"));
    }

    #[test]
    fn values_are_escaped() {
        let html = post_form(
            r#"https://sp.example/acs?a=1&b="2""#,
            SamlMessageType::Response,
            "abc",
            Some(r#"<script>alert("xss")</script>"#),
        );

        assert!(html.contains("a=1&amp;b=&quot;2&quot;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn html_escape_special_chars() {
        let escaped = html_escape(r#"<a href='x'>"&"</a>"#);
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert!(!escaped.contains('"'));
        assert!(!escaped.contains('\''));
    }
}
