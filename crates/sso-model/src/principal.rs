//! Principal domain model.
//!
//! A principal is the authenticated user an assertion is issued for. Profile
//! fields are plain strings; an empty string means the field is unset.

use serde::{Deserialize, Serialize};

/// An authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Principal {
    // === Identity ===
    /// Organization that owns the account.
    pub owner: String,
    /// Stable account name; used as the assertion subject.
    pub name: String,
    /// Opaque account identifier.
    pub id: String,
    /// Creation timestamp as stored upstream.
    pub created_time: String,
    /// Account type.
    #[serde(rename = "type")]
    pub kind: String,

    // === Profile ===
    /// Display name.
    pub display_name: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Avatar URL.
    pub avatar: String,
    /// Region code.
    pub region: String,
    /// Free-form location.
    pub location: String,
    /// Organization affiliation.
    pub affiliation: String,
    /// Job title.
    pub title: String,
    /// Homepage URL.
    pub homepage: String,
    /// Free-form tag.
    pub tag: String,
    /// Preferred language.
    pub language: String,

    // === Authorization ===
    /// Directly assigned role names.
    pub roles: Vec<String>,
    /// Directly assigned permission names.
    pub permissions: Vec<String>,
}

impl Principal {
    /// Creates a principal with only owner and name set.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Adds a role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Adds a permission.
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let principal = Principal::new("acme", "alice")
            .with_email("alice@example.com")
            .with_display_name("Alice")
            .with_role("admin");

        assert_eq!(principal.owner, "acme");
        assert_eq!(principal.name, "alice");
        assert_eq!(principal.email, "alice@example.com");
        assert_eq!(principal.display_name, "Alice");
        assert_eq!(principal.roles, vec!["admin".to_string()]);
        assert!(principal.phone.is_empty());
    }

    #[test]
    fn deserializes_camel_case_with_missing_fields() {
        let json = r#"{"name":"bob","displayName":"Bob","type":"normal-user","roles":["dev"]}"#;
        let principal: Principal = serde_json::from_str(json).expect("principal json");

        assert_eq!(principal.name, "bob");
        assert_eq!(principal.display_name, "Bob");
        assert_eq!(principal.kind, "normal-user");
        assert_eq!(principal.roles, vec!["dev".to_string()]);
        assert!(principal.email.is_empty());
        assert!(principal.permissions.is_empty());
    }

    #[test]
    fn serializes_type_field_name() {
        let mut principal = Principal::new("acme", "carol");
        principal.kind = "normal-user".to_string();
        let value = serde_json::to_value(&principal).expect("serialize");

        assert_eq!(value["type"], "normal-user");
        assert_eq!(value["createdTime"], "");
    }
}
