//! Response document builders.
//!
//! [`ResponseBuilder`] produces SAML 2.0 responses and
//! [`LegacyResponseBuilder`] the SAML 1.1 layout kept for older relying
//! parties. Both return an unsigned [`crate::types::XmlElement`] tree.

mod legacy;
mod response;

pub use legacy::*;
pub use response::*;

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{SamlError, SamlResult};
use crate::types::check_xml_chars;

/// Lifetime of every assertion, counted from its issue instant.
pub const ASSERTION_VALIDITY: TimeDelta = TimeDelta::hours(24);

/// Formats an instant as `YYYY-MM-DDTHH:MM:SSZ`.
#[must_use]
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Returns the formatted issue instant and expiry.
pub(crate) fn validity_window(issue_instant: DateTime<Utc>) -> SamlResult<(String, String)> {
    let expires = issue_instant
        .checked_add_signed(ASSERTION_VALIDITY)
        .ok_or_else(|| SamlError::Serialization("issue instant out of range".to_string()))?;
    Ok((format_instant(issue_instant), format_instant(expires)))
}

/// Passes `value` through when it can be written as XML 1.0.
pub(crate) fn checked(value: &str) -> SamlResult<&str> {
    check_xml_chars(value).map(|()| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn instants_have_second_precision() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
            + TimeDelta::milliseconds(999);
        assert_eq!(format_instant(instant), "2024-03-09T07:05:01Z");
    }

    #[test]
    fn window_is_one_day() {
        let instant = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
        let (now, expires) = validity_window(instant).unwrap();
        assert_eq!(now, "2024-12-31T23:00:00Z");
        assert_eq!(expires, "2025-01-01T23:00:00Z");
    }

    #[test]
    fn control_characters_are_rejected() {
        assert!(checked("alice").is_ok());
        assert!(matches!(checked("al\u{1}ice"), Err(SamlError::Serialization(_))));
    }
}
