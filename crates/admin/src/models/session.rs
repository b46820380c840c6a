//! Session-related types for admin authentication.
//!
//! The host admin performs login and writes the identity into the shared
//! session store; this service only reads it.

use serde::{Deserialize, Serialize};

use discount_rules_core::{AdminRole, AdminUserId, Permission};

/// Session-stored admin identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: String,
    /// Admin's display name.
    pub name: String,
    /// Admin's role/permission level.
    pub role: AdminRole,
}

impl CurrentAdmin {
    /// Whether this admin's role grants a permission.
    #[must_use]
    pub const fn can(&self, permission: Permission) -> bool {
        self.role.grants(permission)
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
