//! Effective role resolution.

use crate::principal::Principal;

/// Computes the role names asserted for a principal.
///
/// Implementations may consult an external authorization service; the
/// provider only serializes the result.
pub trait RoleResolver: Send + Sync {
    /// Returns the principal's effective roles, in assertion order.
    fn effective_roles(&self, principal: &Principal) -> Vec<String>;
}

/// Uses the roles and permissions carried on the principal itself.
///
/// Roles come first, then permissions. Duplicates keep their first position.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignedRoles;

impl RoleResolver for AssignedRoles {
    fn effective_roles(&self, principal: &Principal) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(principal.roles.len() + principal.permissions.len());
        for name in principal.roles.iter().chain(&principal.permissions) {
            if !name.is_empty() && !out.contains(name) {
                out.push(name.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_precede_permissions() {
        let principal = Principal::new("acme", "alice")
            .with_role("admin")
            .with_permission("read-reports")
            .with_role("dev");

        assert_eq!(
            AssignedRoles.effective_roles(&principal),
            vec!["admin", "dev", "read-reports"]
        );
    }

    #[test]
    fn duplicates_and_blanks_are_dropped() {
        let principal = Principal::new("acme", "alice")
            .with_role("admin")
            .with_role("")
            .with_permission("admin")
            .with_permission("audit");

        assert_eq!(AssignedRoles.effective_roles(&principal), vec!["admin", "audit"]);
    }

    #[test]
    fn no_roles_yields_empty() {
        assert!(AssignedRoles
            .effective_roles(&Principal::new("acme", "alice"))
            .is_empty());
    }
}
