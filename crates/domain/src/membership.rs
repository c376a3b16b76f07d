//! Package membership records returned by the member list.

use serde::{Deserialize, Serialize};

use crate::role::PackageRole;

/// One user's membership in an acceptance package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMember {
    /// Member signum.
    pub signum: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Backend package-role name.
    #[serde(default, alias = "userRole")]
    pub role: String,
}

impl PackageMember {
    /// Returns the member's package role; unknown names map to `None`.
    #[must_use]
    pub fn package_role(&self) -> PackageRole {
        PackageRole::from_role_name(self.role.as_str())
    }

    /// Returns whether this membership belongs to `signum`.
    #[must_use]
    pub fn is_member(&self, signum: &str) -> bool {
        self.signum.trim().eq_ignore_ascii_case(signum.trim())
    }
}
