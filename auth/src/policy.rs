use std::fmt;

use uuid::Uuid;

use crate::errors::AuthError;
use crate::identity::Identity;
use crate::identity::Role;

/// Operation a caller wants to perform on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The resource belongs to another subject.
    NotOwner,
    /// The resource has no owner yet; only admins may act (provisioning).
    AdminRequired,
}

impl DenyReason {
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::NotOwner => "not owner and not admin",
            DenyReason::AdminRequired => "admin role required",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(AuthError::AuthorizationDenied(reason)),
        }
    }
}

/// Decide whether `identity` may perform `action` on a resource owned by `owner`.
///
/// Admins are always allowed. Otherwise the caller must own the resource;
/// `owner == None` means there is no owner to match, which only admins pass.
/// The action itself does not change the outcome.
pub fn authorize(identity: &Identity, _action: Action, owner: Option<Uuid>) -> Decision {
    if identity.is_admin() {
        return Decision::Allow;
    }

    match owner {
        Some(owner) if owner == identity.subject_id => Decision::Allow,
        Some(_) => Decision::Deny(DenyReason::NotOwner),
        None => Decision::Deny(DenyReason::AdminRequired),
    }
}

/// Role change that may be applied on behalf of `requester`.
///
/// Non-admin requests lose the role silently rather than failing.
pub fn permitted_role_change(requester: &Identity, requested: Option<Role>) -> Option<Role> {
    requested.filter(|_| requester.is_admin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Identity {
        Identity::new(Uuid::new_v4(), "user@x.com", Role::User)
    }

    fn admin() -> Identity {
        Identity::new(Uuid::new_v4(), "admin@x.com", Role::Admin)
    }

    #[test]
    fn test_admin_always_allowed() {
        let admin = admin();

        for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            assert_eq!(authorize(&admin, action, None), Decision::Allow);
            assert_eq!(
                authorize(&admin, action, Some(admin.subject_id)),
                Decision::Allow
            );
            assert_eq!(
                authorize(&admin, action, Some(Uuid::new_v4())),
                Decision::Allow
            );
        }
    }

    #[test]
    fn test_owner_allowed() {
        let user = user();
        assert_eq!(
            authorize(&user, Action::Update, Some(user.subject_id)),
            Decision::Allow
        );
    }

    #[test]
    fn test_other_owner_denied() {
        let decision = authorize(&user(), Action::Update, Some(Uuid::new_v4()));

        assert_eq!(decision, Decision::Deny(DenyReason::NotOwner));
        assert_eq!(
            decision.into_result().unwrap_err().to_string(),
            "Forbidden: not owner and not admin"
        );
    }

    #[test]
    fn test_provisioning_requires_admin() {
        assert_eq!(
            authorize(&user(), Action::Create, None),
            Decision::Deny(DenyReason::AdminRequired)
        );
        assert_eq!(DenyReason::AdminRequired.message(), "admin role required");
    }

    #[test]
    fn test_role_escalation_guard() {
        assert_eq!(permitted_role_change(&user(), Some(Role::Admin)), None);
        assert_eq!(
            permitted_role_change(&admin(), Some(Role::Admin)),
            Some(Role::Admin)
        );
        assert_eq!(permitted_role_change(&admin(), None), None);
    }
}
