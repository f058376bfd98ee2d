//! Role resolution boundary.
//!
//! In a production deployment the role attached to a fabricated demo
//! account would come from a real credential and authorization check.
//! The service only sees this trait; the email-substring heuristic below
//! is one demo implementation, not a contract.

use super::model::Role;

/// Resolves the role to attach to a newly fabricated account.
pub trait RoleResolver: Send + Sync {
    /// Returns the role for the account identified by `email`.
    fn resolve(&self, email: &str) -> Role;
}

/// Demo resolver that derives the role from substrings of the email.
///
/// `"client"` anywhere in the address yields [`Role::Client`], `"admin"`
/// yields [`Role::Admin`], anything else [`Role::User`]. A stand-in for a
/// real authorization boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailHeuristicRoleResolver;

impl RoleResolver for EmailHeuristicRoleResolver {
    fn resolve(&self, email: &str) -> Role {
        if email.contains("client") {
            Role::Client
        } else if email.contains("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_client_from_email() {
        let resolver = EmailHeuristicRoleResolver;
        assert_eq!(resolver.resolve("alice.client@x.com"), Role::Client);
    }

    #[test]
    fn resolves_admin_from_email() {
        let resolver = EmailHeuristicRoleResolver;
        assert_eq!(resolver.resolve("bob.admin@x.com"), Role::Admin);
    }

    #[test]
    fn defaults_to_user() {
        let resolver = EmailHeuristicRoleResolver;
        assert_eq!(resolver.resolve("carol@x.com"), Role::User);
    }
}
