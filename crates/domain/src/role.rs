//! Application and package-membership roles.
//!
//! Backend role names are normalized here, at the boundary. Derivation is
//! total: anything unrecognized becomes the `None` role, which grants nothing.

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Role kinds that can key a permission table.
pub trait TableRole: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Returns every role of this kind, including the empty `None` role.
    fn all() -> &'static [Self];

    /// Returns the role that grants no permissions.
    fn none() -> Self;
}

/// Application-level role held by a user. A user may hold several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages projects and their packages.
    ProjectAdmin,
    /// Vendor staff preparing acceptance packages.
    EricssonContributor,
    /// Customer staff approving acceptance packages.
    CustomerApprover,
    /// Operations administrator managing users, customers and configuration.
    OpsAdmin,
    /// No recognized role.
    None,
}

impl Role {
    /// Returns the backend role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectAdmin => "Project Admin",
            Self::EricssonContributor => "Ericsson Contributor",
            Self::CustomerApprover => "Customer Approver",
            Self::OpsAdmin => "Ops Admin",
            Self::None => "None",
        }
    }

    /// Maps a backend role name to a role. Unknown names map to [`Role::None`].
    #[must_use]
    pub fn from_role_name(value: &str) -> Self {
        match normalize(value).as_str() {
            "projectadmin" => Self::ProjectAdmin,
            "ericssoncontributor" => Self::EricssonContributor,
            "customerapprover" => Self::CustomerApprover,
            "opsadmin" => Self::OpsAdmin,
            _ => Self::None,
        }
    }

    /// Maps each backend role name, keeping order and duplicates.
    #[must_use]
    pub fn from_role_names<S: AsRef<str>>(values: &[S]) -> Vec<Self> {
        values
            .iter()
            .map(|value| Self::from_role_name(value.as_ref()))
            .collect()
    }
}

impl TableRole for Role {
    fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::ProjectAdmin,
            Role::EricssonContributor,
            Role::CustomerApprover,
            Role::OpsAdmin,
            Role::None,
        ];

        ALL
    }

    fn none() -> Self {
        Self::None
    }
}

/// Role of a user inside one acceptance package. Single-valued per membership.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PackageRole {
    /// Vendor member uploading evidences.
    EricssonContributor,
    /// Vendor member approving before customer hand-over.
    EricssonApprover,
    /// Customer member approving line items.
    CustomerApprover,
    /// Customer member with read access.
    CustomerObserver,
    /// Not a member, or membership not yet loaded.
    #[default]
    None,
}

impl PackageRole {
    /// Returns the backend role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EricssonContributor => "Ericsson Contributor",
            Self::EricssonApprover => "Ericsson Approver",
            Self::CustomerApprover => "Customer Approver",
            Self::CustomerObserver => "Customer Observer",
            Self::None => "None",
        }
    }

    /// Maps a backend membership role name. Unknown names map to [`PackageRole::None`].
    #[must_use]
    pub fn from_role_name(value: &str) -> Self {
        match normalize(value).as_str() {
            "ericssoncontributor" => Self::EricssonContributor,
            "ericssonapprover" => Self::EricssonApprover,
            "customerapprover" => Self::CustomerApprover,
            "customerobserver" => Self::CustomerObserver,
            _ => Self::None,
        }
    }
}

impl TableRole for PackageRole {
    fn all() -> &'static [Self] {
        const ALL: &[PackageRole] = &[
            PackageRole::EricssonContributor,
            PackageRole::EricssonApprover,
            PackageRole::CustomerApprover,
            PackageRole::CustomerObserver,
            PackageRole::None,
        ];

        ALL
    }

    fn none() -> Self {
        Self::None
    }
}

// "Ericsson Contributor", "ericsson_contributor" and "EricssonContributor" all
// name the same role.
fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|character| character.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
