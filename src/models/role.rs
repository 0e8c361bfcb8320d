use serde::{Deserialize, Serialize};

/// Role id seeded for the unrestricted administrator role.
pub const ADMIN_ROLE_ID: i32 = 1;
/// Role id seeded for the regular client role.
pub const CLIENT_ROLE_ID: i32 = 2;

/// A stored role row. Authorization never inspects the row directly; it
/// resolves the row into a [`RoleKind`] first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    pub name: String,
}

impl Role {
    #[must_use]
    pub fn kind(&self) -> RoleKind {
        RoleKind::from_name(&self.name)
    }
}

/// The closed set of roles the service understands. A role id that has no
/// row, or a row whose name is not recognized, resolves to `Unknown` and
/// grants nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Admin,
    Client,
    Unknown,
}

impl RoleKind {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Admin" => Self::Admin,
            "Client" => Self::Client,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    #[must_use]
    pub const fn is_client(self) -> bool {
        matches!(self, Self::Client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        assert_eq!(RoleKind::from_name("Admin"), RoleKind::Admin);
        assert_eq!(RoleKind::from_name("Client"), RoleKind::Client);
    }

    #[test]
    fn unrecognized_names_grant_nothing() {
        for name in ["admin", "ADMIN", "Moderator", ""] {
            let kind = RoleKind::from_name(name);
            assert_eq!(kind, RoleKind::Unknown);
            assert!(!kind.is_admin());
            assert!(!kind.is_client());
        }
    }

    #[test]
    fn probes_are_mutually_exclusive() {
        for kind in [RoleKind::Admin, RoleKind::Client, RoleKind::Unknown] {
            assert!(!(kind.is_admin() && kind.is_client()));
        }
    }
}
