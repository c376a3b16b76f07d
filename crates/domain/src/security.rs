//! Application and package-scoped permissions with their kebab-case wire names.

use std::str::FromStr;

use eca_core::AppError;
use serde::{Deserialize, Serialize};

/// Application-level capabilities gated by the permission resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    /// Shows the dashboard navigation entry.
    ViewDashboardMenuItem,
    /// Shows the projects navigation entry.
    ViewProjectsMenuItem,
    /// Shows the customers navigation entry.
    ViewCustomersMenuItem,
    /// Shows the user management navigation entry.
    ViewUsersMenuItem,
    /// Shows the configuration management navigation entry.
    ViewConfigurationsMenuItem,
    /// Allows creating projects.
    CreateProject,
    /// Allows editing project details.
    EditProject,
    /// Allows creating acceptance packages.
    CreatePackage,
    /// Allows onboarding customers.
    CreateCustomer,
    /// Allows editing customers.
    EditCustomer,
    /// Allows creating users.
    CreateUser,
    /// Allows editing users.
    EditUser,
    /// Allows soft-deleting users.
    DeleteUser,
    /// Allows editing configuration entries.
    EditConfiguration,
}

impl Permission {
    /// Returns a stable wire value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewDashboardMenuItem => "view-dashboard-menu-item",
            Self::ViewProjectsMenuItem => "view-projects-menu-item",
            Self::ViewCustomersMenuItem => "view-customers-menu-item",
            Self::ViewUsersMenuItem => "view-users-menu-item",
            Self::ViewConfigurationsMenuItem => "view-configurations-menu-item",
            Self::CreateProject => "create-project",
            Self::EditProject => "edit-project",
            Self::CreatePackage => "create-package",
            Self::CreateCustomer => "create-customer",
            Self::EditCustomer => "edit-customer",
            Self::CreateUser => "create-user",
            Self::EditUser => "edit-user",
            Self::DeleteUser => "delete-user",
            Self::EditConfiguration => "edit-configuration",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::ViewDashboardMenuItem,
            Permission::ViewProjectsMenuItem,
            Permission::ViewCustomersMenuItem,
            Permission::ViewUsersMenuItem,
            Permission::ViewConfigurationsMenuItem,
            Permission::CreateProject,
            Permission::EditProject,
            Permission::CreatePackage,
            Permission::CreateCustomer,
            Permission::EditCustomer,
            Permission::CreateUser,
            Permission::EditUser,
            Permission::DeleteUser,
            Permission::EditConfiguration,
        ];

        ALL
    }

    /// Parses an optional route-level permission value.
    ///
    /// Empty values mean "no restriction" and yield `Ok(None)`.
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, AppError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::from_str(value).map(Some),
        }
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|permission| permission.as_str() == value)
            .copied()
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

/// Package-scoped capabilities gated by the package permission resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentActionPermission {
    /// Allows opening the package.
    ViewPackage,
    /// Allows editing package details.
    EditPackage,
    /// Allows uploading evidences.
    UploadEvidence,
    /// Allows deleting evidences.
    DeleteEvidence,
    /// Allows editing evidence markings.
    EditMarkings,
    /// Allows submitting the package for review.
    SubmitPackage,
    /// Allows approving line items and evidences.
    ApproveLineItem,
    /// Allows rejecting line items and evidences.
    RejectLineItem,
    /// Allows adding review comments.
    AddComment,
    /// Allows downloading package files.
    DownloadEvidence,
}

impl ComponentActionPermission {
    /// Returns a stable wire value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewPackage => "view-package",
            Self::EditPackage => "edit-package",
            Self::UploadEvidence => "upload-evidence",
            Self::DeleteEvidence => "delete-evidence",
            Self::EditMarkings => "edit-markings",
            Self::SubmitPackage => "submit-package",
            Self::ApproveLineItem => "approve-line-item",
            Self::RejectLineItem => "reject-line-item",
            Self::AddComment => "add-comment",
            Self::DownloadEvidence => "download-evidence",
        }
    }

    /// Returns all known package permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ComponentActionPermission] = &[
            ComponentActionPermission::ViewPackage,
            ComponentActionPermission::EditPackage,
            ComponentActionPermission::UploadEvidence,
            ComponentActionPermission::DeleteEvidence,
            ComponentActionPermission::EditMarkings,
            ComponentActionPermission::SubmitPackage,
            ComponentActionPermission::ApproveLineItem,
            ComponentActionPermission::RejectLineItem,
            ComponentActionPermission::AddComment,
            ComponentActionPermission::DownloadEvidence,
        ];

        ALL
    }
}

impl FromStr for ComponentActionPermission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|permission| permission.as_str() == value)
            .copied()
            .ok_or_else(|| {
                AppError::Validation(format!("unknown package permission value '{value}'"))
            })
    }
}
